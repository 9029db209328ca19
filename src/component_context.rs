//! Per-draw context handed to screens and theme extras.

/// Where a drawing sits in the frame's composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The bottom screen of the stack.
    Background,
    /// A screen kept visible under a modal top, or one sliding out.
    Beneath,
    /// The top screen.
    Top,
    /// Theme extras, drawn over everything including the screensaver.
    Decoration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentContext {
    layer: Layer,
    focused: bool,
    sliding: bool,
}

impl ComponentContext {
    /// Context for the bottom screen. It holds focus only when it is alone.
    pub const fn background(alone: bool) -> Self {
        Self {
            layer: Layer::Background,
            focused: alone,
            sliding: false,
        }
    }

    pub const fn beneath() -> Self {
        Self {
            layer: Layer::Beneath,
            focused: false,
            sliding: false,
        }
    }

    pub const fn top() -> Self {
        Self {
            layer: Layer::Top,
            focused: true,
            sliding: false,
        }
    }

    pub const fn decoration() -> Self {
        Self {
            layer: Layer::Decoration,
            focused: false,
            sliding: false,
        }
    }

    pub const fn with_sliding(mut self, sliding: bool) -> Self {
        self.sliding = sliding;
        self
    }

    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// True for the screen that receives input.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// True when drawn above the background wash.
    pub const fn over_wash(&self) -> bool {
        !matches!(self.layer, Layer::Background)
    }

    /// True while a slide transition is moving this screen.
    pub const fn sliding(&self) -> bool {
        self.sliding
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::background(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_top_or_a_lone_background_has_focus() {
        assert!(ComponentContext::top().focused());
        assert!(ComponentContext::background(true).focused());
        assert!(!ComponentContext::background(false).focused());
        assert!(!ComponentContext::beneath().focused());
        assert!(ComponentContext::decoration().over_wash());
        assert!(!ComponentContext::background(false).over_wash());
    }
}
