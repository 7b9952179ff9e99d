bitflags::bitflags! {
    /// Flags accepted by [`Overlay::begin_window`](super::Overlay::begin_window).
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct WindowFlags: u32 {
        const NO_TITLE_BAR  = 1 << 0;
        const NO_RESIZE     = 1 << 1;
        const NO_MOVE       = 1 << 2;
        const NO_SCROLLBAR  = 1 << 3;
        const NO_COLLAPSE   = 1 << 5;
        const NO_BACKGROUND = 1 << 7;

        const NO_DECORATION = Self::NO_TITLE_BAR.bits()
            | Self::NO_RESIZE.bits()
            | Self::NO_SCROLLBAR.bits()
            | Self::NO_COLLAPSE.bits();
    }
}

impl WindowFlags {
    #[inline]
    pub fn draws_title_bar(self) -> bool {
        !self.contains(WindowFlags::NO_TITLE_BAR)
    }

    #[inline]
    pub fn draws_background(self) -> bool {
        !self.contains(WindowFlags::NO_BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_decoration_excludes_move_and_background() {
        let f = WindowFlags::NO_DECORATION;
        assert!(f.contains(WindowFlags::NO_TITLE_BAR | WindowFlags::NO_RESIZE));
        assert!(f.contains(WindowFlags::NO_SCROLLBAR | WindowFlags::NO_COLLAPSE));
        assert!(!f.contains(WindowFlags::NO_MOVE));
        assert!(f.draws_background());
        assert!(!f.draws_title_bar());
    }
}
