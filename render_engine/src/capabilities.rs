//! Runtime capabilities reported by render backends.

use bitflags::bitflags;

bitflags! {
    /// Features a backend can provide on the current machine.
    ///
    /// An engine is enabled only when the backend's probed capabilities
    /// contain every capability requested in `LoadParams::required_capabilities`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Can run without a window or display server
        const HEADLESS          = 1 << 0;
        /// Can present to an on-screen window
        const WINDOWED          = 1 << 1;
        /// Programmable shader support
        const SHADERS           = 1 << 2;
        /// Can render into offscreen textures
        const RENDER_TO_TEXTURE = 1 << 3;
        /// Depth buffer support
        const DEPTH_BUFFER      = 1 << 4;
        /// Compute dispatch support
        const COMPUTE           = 1 << 5;
    }
}

impl Capabilities {
    /// Capabilities in `required` that `self` does not provide
    pub fn missing(self, required: Capabilities) -> Capabilities {
        required.difference(self)
    }

    /// Whether every capability in `required` is provided
    pub fn satisfies(self, required: Capabilities) -> bool {
        self.contains(required)
    }
}
