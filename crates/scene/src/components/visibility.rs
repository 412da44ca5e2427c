/// Whether the 3D viewer is currently shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub fn visible() -> Self {
        Self { visible: true }
    }

    pub fn from_flag(visible: bool) -> Self {
        Self { visible }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::visible()
    }
}
