use hough_circles::PixelGrid;

/// A filled disc drawn into a synthetic scene.
#[derive(Debug, Clone, Copy)]
pub struct Disc {
    pub cx: i64,
    pub cy: i64,
    pub radius: i64,
    pub color: [u8; 3],
}

impl Disc {
    pub fn new(cx: i64, cy: i64, radius: i64, color: [u8; 3]) -> Self {
        Self {
            cx,
            cy,
            radius,
            color,
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Solid background with filled discs painted in order, later discs on top.
pub fn disc_scene(width: usize, height: usize, background: [u8; 3], discs: &[Disc]) -> PixelGrid {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    PixelGrid::from_fn(width, height, |x, y| {
        discs
            .iter()
            .rev()
            .find(|d| d.contains(x as i64, y as i64))
            .map_or(background, |d| d.color)
    })
    .expect("synthetic scene dimensions are valid")
}
