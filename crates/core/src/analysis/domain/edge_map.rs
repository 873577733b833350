/// Binary edge map over a region sub-image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    width: usize,
    height: usize,
    edges: Vec<bool>,
}

impl EdgeMap {
    pub fn new(width: usize, height: usize, edges: Vec<bool>) -> Self {
        debug_assert_eq!(edges.len(), width * height, "edges length must equal width * height");
        Self {
            width,
            height,
            edges,
        }
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![false; width * height])
    }

    /// Builds a map from 8-bit operator output: any non-zero pixel is an edge.
    pub fn from_gray(width: usize, height: usize, pixels: &[u8]) -> Self {
        Self::new(width, height, pixels.iter().map(|&p| p != 0).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.edges[y * self.width + x]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }

    /// Percentage of edge pixels over the map's own area.
    pub fn density_percent(&self) -> f64 {
        if self.area() == 0 {
            return 0.0;
        }
        self.edge_count() as f64 / self.area() as f64 * 100.0
    }
}
