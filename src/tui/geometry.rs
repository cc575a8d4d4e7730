/// Idx encapsulates the x and y coordinates of a point on the screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Idx(pub usize, pub usize);

impl Idx {
    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Bounds2D(pub usize, pub usize);

impl Bounds2D {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.0
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Rectangle(pub Idx, pub Bounds2D);

impl Rectangle {
    #[inline(always)]
    pub(crate) fn width(&self) -> usize {
        self.1 .0
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.1 .1
    }

    #[inline(always)]
    pub(crate) fn x(&self) -> usize {
        self.0 .0
    }

    #[inline(always)]
    pub(crate) fn y(&self) -> usize {
        self.0 .1
    }

    /// Exclusive lower-right extent of the rectangle.
    #[inline(always)]
    pub(crate) fn extents(&self) -> (usize, usize) {
        (self.0 .0 + self.1 .0, self.0 .1 + self.1 .1)
    }

    /// Screen index at which a run of `len` characters starts so that it
    /// sits horizontally centered on row `row` of the rectangle. Runs wider
    /// than the rectangle start at its left edge.
    pub(crate) fn centered_text(&self, row: usize, len: usize) -> Idx {
        let pad = self.width().saturating_sub(len) / 2;
        Idx(self.x() + pad, self.y() + row)
    }

    /// A rectangle of the given bounds centered within this one.
    pub(crate) fn centered_within(&self, bounds: Bounds2D) -> Rectangle {
        let x = self.x() + self.width().saturating_sub(bounds.width()) / 2;
        let y = self.y() + self.height().saturating_sub(bounds.height()) / 2;
        Rectangle(Idx(x, y), bounds)
    }
}
