/// Rising-edge detector for a sampled boolean input.
///
/// Fires when the previous sample was low and the current one is high. The
/// previous sample starts low, so a button already held at startup fires once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample; returns `true` on a not-pressed to pressed transition.
    pub fn update(&mut self, current: bool) -> bool {
        let rising = !self.previous && current;
        self.previous = current;
        rising
    }

    /// The last sample fed to [`update`](Self::update).
    pub fn previous(&self) -> bool {
        self.previous
    }
}
