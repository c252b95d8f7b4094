//! Headless runs of the planner: search, book, and let the camera land.

use catalog::{FlightOffer, FlightSearch, OfferSource, PriceAlert, Trip, cheapest_offer};
use chrono::{NaiveDate, NaiveDateTime};
use foundation::math::Vec3;
use planner::{Planner, PlannerError};
use runtime::event_bus::Event;

#[derive(Debug, Clone)]
pub struct FlyOptions {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    /// Book the cheapest offer as a trip.
    pub save: bool,
    /// Put a price alert on the cheapest offer.
    pub alert: bool,
    /// Orbit distance factor applied before searching.
    pub zoom: f64,
    pub max_frames: u64,
    pub viewport: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct FlyReport {
    pub source: OfferSource,
    pub offers: Vec<FlightOffer>,
    pub trip: Option<Trip>,
    pub alert: Option<PriceAlert>,
    pub frames: u64,
    pub camera: Vec3,
    pub route_points: usize,
    /// Trip under the screen center once the camera has landed. Clicking it
    /// selects it, which starts another (short) flight.
    pub picked: Option<String>,
    pub events: Vec<Event>,
}

/// Tick until the camera stops flying or `max_frames` have passed.
pub fn settle(planner: &mut Planner, max_frames: u64) -> u64 {
    let mut frame = planner.frame();
    let mut ticks = 0;
    while planner.camera().is_flying() && ticks < max_frames {
        frame = frame.next();
        planner.tick(frame);
        ticks += 1;
    }
    ticks
}

pub fn run_fly(
    planner: &mut Planner,
    provider: &dyn FlightSearch,
    opts: &FlyOptions,
    now: NaiveDateTime,
) -> Result<FlyReport, PlannerError> {
    planner.zoom(opts.zoom);
    let date = opts.date.format("%Y-%m-%d").to_string();
    let outcome = planner.search(provider, &opts.origin, &opts.destination, &date)?;
    let (origin, dest) = (&outcome.request.origin, &outcome.request.destination);
    let cheapest = cheapest_offer(&outcome.offers).map(|(_, offer)| offer.clone());

    let mut trip = None;
    let mut alert = None;
    if let Some(offer) = &cheapest {
        if opts.save {
            trip = Some(planner.save_trip(
                dest,
                &offer.airline,
                &offer.price,
                Some(origin.as_str()),
                opts.date,
            )?);
        }
        if opts.alert {
            alert = Some(planner.add_alert_from_offer(dest, &offer.price, now)?);
        }
    }

    let frames = settle(planner, opts.max_frames);
    let camera = planner.camera().position();
    let route_points = planner
        .world()
        .routes()
        .first()
        .map_or(0, |(_, route)| route.points.len());

    let (width, height) = opts.viewport;
    let picked = planner
        .click(width * 0.5, height * 0.5, width, height)
        .map(|trip| trip.id);
    if picked.is_some() {
        settle(planner, opts.max_frames);
    }

    tracing::info!(frames, picked = ?picked, "camera settled");
    Ok(FlyReport {
        source: outcome.source,
        offers: outcome.offers,
        trip,
        alert,
        frames,
        camera,
        route_points,
        picked,
        events: planner.drain_events(),
    })
}
