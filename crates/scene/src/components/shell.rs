/// Solid sphere centered on the origin: the globe itself or its atmosphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Shell {
    pub radius: f64,
    pub kind: ShellKind,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShellKind {
    /// Textured, opaque.
    Surface,
    /// Back-face glow, additive.
    Atmosphere,
}

impl Shell {
    pub fn surface(radius: f64) -> Self {
        Self {
            radius,
            kind: ShellKind::Surface,
        }
    }

    pub fn atmosphere(radius: f64) -> Self {
        Self {
            radius,
            kind: ShellKind::Atmosphere,
        }
    }
}
