use catalog::{
    AlertDraft, AlertId, CityDirectory, FlightSearch, InMemoryTravelStore, OfferSource,
    PassengerCounts, PassengerKind, PriceAlert, SearchOutcome, SearchRequest, TravelStore, Trip,
    alert_from_offer, normalize_code, search_with_fallback,
};
use chrono::{NaiveDate, NaiveDateTime};
use foundation::math::GeoPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::event_bus::{Event, EventBus, EventKind};
use runtime::frame::Frame;
use scene::prefabs::{GlobeEntities, spawn_globe};
use scene::{CameraController, EntityId, Ray, SURFACE_RADIUS, World, pick_marker, route_between};

use crate::{PlannerError, TripsTab, View};

/// Where trips to unknown destinations are pinned: a box over central Europe.
const UNKNOWN_LAT_RANGE: (f64, f64) = (48.0, 53.0);
const UNKNOWN_LON_RANGE: (f64, f64) = (10.0, 15.0);

/// Image placeholder seeds are drawn from `0..IMAGE_SEEDS`.
const IMAGE_SEEDS: u32 = 100;

pub struct Planner {
    cities: CityDirectory,
    store: InMemoryTravelStore,
    world: World,
    globe: GlobeEntities,
    camera: CameraController,
    events: EventBus,
    passengers: PassengerCounts,
    view: View,
    tab: TripsTab,
    selected: Option<String>,
    last_search: Option<SearchOutcome>,
    unread_alerts: bool,
    frame: Frame,
    next_trip: u64,
    rng: StdRng,
}

impl Planner {
    pub fn new(cities: CityDirectory, store: InMemoryTravelStore, seed: u64) -> Self {
        let mut world = World::new();
        let globe = spawn_globe(&mut world);
        let mut planner = Self {
            cities,
            store,
            world,
            globe,
            camera: CameraController::new(),
            events: EventBus::new(),
            passengers: PassengerCounts::default(),
            view: View::Home,
            tab: TripsTab::Trips,
            selected: None,
            last_search: None,
            unread_alerts: false,
            frame: Frame::new(0, Frame::DT_60HZ),
            next_trip: 1,
            rng: StdRng::seed_from_u64(seed),
        };
        planner.render_markers();
        planner
    }

    /// Built-in airports and the sample alerts.
    pub fn demo(seed: u64) -> Self {
        Self::new(
            CityDirectory::builtin(),
            InMemoryTravelStore::with_demo_alerts(),
            seed,
        )
    }

    pub fn cities(&self) -> &CityDirectory {
        &self.cities
    }

    pub fn store(&self) -> &InMemoryTravelStore {
        &self.store
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn globe(&self) -> GlobeEntities {
        self.globe
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Scale the orbit distance by `factor` within the zoom limits. Later
    /// flights keep whatever distance this leaves.
    pub fn zoom(&mut self, factor: f64) -> f64 {
        self.camera.zoom_by(factor);
        self.camera.distance()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn passengers(&self) -> PassengerCounts {
        self.passengers
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn tab(&self) -> TripsTab {
        self.tab
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn last_search(&self) -> Option<&SearchOutcome> {
        self.last_search.as_ref()
    }

    pub fn has_unread_alerts(&self) -> bool {
        self.unread_alerts
    }

    /// Trip shown in the detail sheet, if one is open.
    pub fn selected_trip(&self) -> Option<Trip> {
        let id = self.selected.as_deref()?;
        self.store.trip(id).ok().flatten()
    }

    pub fn adjust_passengers(&mut self, kind: PassengerKind, delta: i32) -> u32 {
        self.passengers.adjust(kind, delta);
        self.passengers.get(kind)
    }

    /// Search flights, draw the route and, for live results, fly to the
    /// destination. Provider failures fall back to the fixed offers, which
    /// draw the route without moving the camera.
    pub fn search(
        &mut self,
        provider: &dyn FlightSearch,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Result<SearchOutcome, PlannerError> {
        let request = SearchRequest {
            passengers: self.passengers,
            ..SearchRequest::new(origin, destination, date)
        };
        let outcome = search_with_fallback(provider, &request)?;
        let (origin, dest) = (&outcome.request.origin, &outcome.request.destination);

        self.world.clear_overlays();
        self.draw_route(origin, dest);
        if outcome.source == OfferSource::Provider
            && let Some(location) = self.cities.get(dest)
        {
            self.camera.fly_to(location, self.frame.time);
        }

        tracing::info!(
            origin = %origin,
            destination = %dest,
            offers = outcome.offers.len(),
            fallback = outcome.source == OfferSource::Fallback,
            "search finished"
        );
        self.events.emit(
            self.frame,
            EventKind::Search,
            format!("{origin}->{dest}: {} offers", outcome.offers.len()),
        );
        self.last_search = Some(outcome.clone());
        Ok(outcome)
    }

    /// Book a search result as a trip, pin it and fly there.
    ///
    /// Destinations missing from the directory get a random spot in central
    /// Europe so the trip still shows up on the globe.
    pub fn save_trip(
        &mut self,
        dest: &str,
        airline: &str,
        price: &str,
        origin: Option<&str>,
        date: NaiveDate,
    ) -> Result<Trip, PlannerError> {
        let dest = normalize_code(dest);
        let origin = origin.map(normalize_code).filter(|o| !o.is_empty());
        let location = match self.cities.get(&dest) {
            Some(location) => location,
            None => GeoPoint::new(
                self.rng
                    .random_range(UNKNOWN_LAT_RANGE.0..UNKNOWN_LAT_RANGE.1),
                self.rng
                    .random_range(UNKNOWN_LON_RANGE.0..UNKNOWN_LON_RANGE.1),
            ),
        };

        let id = self.allocate_trip_id()?;
        let trip = Trip::from_booking(
            id,
            &dest,
            origin.as_deref(),
            airline,
            price,
            location,
            date.format("%b %Y").to_string().to_uppercase(),
            self.rng.random_range(0..IMAGE_SEEDS),
        );
        self.store.upsert_trip(trip.clone())?;

        self.render_markers();
        if let Some(origin) = &origin {
            self.draw_route(origin, &dest);
        }
        self.camera.fly_to(location, self.frame.time);

        tracing::info!(id = %trip.id, dest = %dest, "trip saved");
        self.events.emit(
            self.frame,
            EventKind::Trip,
            format!("saved {} to {dest}", trip.id),
        );
        Ok(trip)
    }

    pub fn delete_trip(&mut self, id: &str) -> Result<Trip, PlannerError> {
        let trip = self
            .store
            .trip(id)?
            .ok_or_else(|| PlannerError::UnknownTrip(id.to_string()))?;
        self.store.delete_trip(id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.render_markers();

        tracing::info!(id, "trip deleted");
        self.events
            .emit(self.frame, EventKind::Trip, format!("deleted {id}"));
        Ok(trip)
    }

    /// Open the detail sheet for a trip and fly to it.
    pub fn select_trip(&mut self, id: &str) -> Result<Trip, PlannerError> {
        let trip = self
            .store
            .trip(id)?
            .ok_or_else(|| PlannerError::UnknownTrip(id.to_string()))?;
        self.selected = Some(trip.id.clone());
        self.camera.fly_to(trip.location, self.frame.time);

        self.events
            .emit(self.frame, EventKind::Trip, format!("selected {id}"));
        Ok(trip)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Select the trip whose marker `ray` hits first.
    pub fn pick(&mut self, ray: Ray) -> Option<Trip> {
        let hit = pick_marker(&self.world, ray)?;
        match self.select_trip(&hit.key) {
            Ok(trip) => Some(trip),
            Err(err) => {
                tracing::warn!(key = %hit.key, "picked marker without a trip: {err}");
                None
            }
        }
    }

    /// [`Planner::pick`] for a click at pixel `(x, y)` in a `width` x `height` view.
    pub fn click(&mut self, x: f64, y: f64, width: f64, height: f64) -> Option<Trip> {
        self.camera.set_aspect(width, height);
        let ray = Ray::from_screen(&self.camera, x, y, width, height)?;
        self.pick(ray)
    }

    /// Watch a search result's route at 85% of its quoted price.
    ///
    /// Origin and travel date come from the last search when there was one.
    pub fn add_alert_from_offer(
        &mut self,
        dest: &str,
        price: &str,
        now: NaiveDateTime,
    ) -> Result<PriceAlert, PlannerError> {
        let (origin, date) = match &self.last_search {
            Some(last) => (
                Some(last.request.origin.clone()),
                NaiveDate::parse_from_str(&last.request.date, "%Y-%m-%d").ok(),
            ),
            None => (None, None),
        };
        let id = self.store.next_alert_id();
        let alert = alert_from_offer(
            id,
            origin.as_deref(),
            dest,
            price,
            date,
            &self.passengers,
            now,
            &mut self.rng,
        )?;
        self.insert_alert(alert)
    }

    pub fn create_alert(
        &mut self,
        draft: AlertDraft,
        now: NaiveDateTime,
    ) -> Result<PriceAlert, PlannerError> {
        let id = self.store.next_alert_id();
        let alert = draft.into_alert(id, now, &mut self.rng)?;
        self.insert_alert(alert)
    }

    pub fn delete_alert(&mut self, id: AlertId) -> Result<PriceAlert, PlannerError> {
        let alert = self.store.alert(id)?.ok_or(PlannerError::UnknownAlert(id))?;
        self.store.delete_alert(id)?;

        tracing::info!(id, "price alert deleted");
        self.events
            .emit(self.frame, EventKind::Alert, format!("deleted alert {id}"));
        Ok(alert)
    }

    /// Mark new alerts as seen.
    pub fn acknowledge_alerts(&mut self) {
        self.unread_alerts = false;
    }

    /// Change screen. Only the home view lets the globe spin.
    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.camera.set_auto_rotate(view.auto_rotates());
        self.events.emit(self.frame, EventKind::View, view.as_str());
    }

    pub fn show_tab(&mut self, tab: TripsTab) {
        self.tab = tab;
    }

    /// Advance the clock to `frame` and move the camera.
    pub fn tick(&mut self, frame: Frame) {
        let was_flying = self.camera.is_flying();
        self.frame = frame;
        self.camera.update(frame);
        if was_flying && !self.camera.is_flying() {
            self.events
                .emit(frame, EventKind::Camera, "fly-to finished");
        }
    }

    fn insert_alert(&mut self, alert: PriceAlert) -> Result<PriceAlert, PlannerError> {
        self.store.upsert_alert(alert.clone())?;
        self.unread_alerts = true;

        tracing::info!(
            id = alert.id,
            route = %format!("{}->{}", alert.origin, alert.dest),
            target = alert.target_price,
            "price alert created"
        );
        self.events.emit(
            self.frame,
            EventKind::Alert,
            format!(
                "alert {} on {}->{} at {}",
                alert.id, alert.origin, alert.dest, alert.target_price
            ),
        );
        Ok(alert)
    }

    /// Replace all overlays with one marker per stored trip.
    fn render_markers(&mut self) {
        self.world.clear_overlays();
        let trips = match self.store.trips() {
            Ok(trips) => trips,
            Err(err) => {
                tracing::warn!("could not list trips: {err}");
                return;
            }
        };
        for trip in trips {
            self.world
                .spawn_marker(trip.location.project(SURFACE_RADIUS), trip.id);
        }
    }

    fn draw_route(&mut self, origin: &str, dest: &str) -> Option<EntityId> {
        let path = route_between(&self.cities, origin, dest, SURFACE_RADIUS)?;
        let entity = self.world.spawn_route(path);
        self.events
            .emit(self.frame, EventKind::Route, format!("{origin}->{dest}"));
        Some(entity)
    }

    fn allocate_trip_id(&mut self) -> Result<String, PlannerError> {
        loop {
            let id = format!("t_{}", self.next_trip);
            self.next_trip += 1;
            if self.store.trip(&id)?.is_none() {
                return Ok(id);
            }
        }
    }
}
