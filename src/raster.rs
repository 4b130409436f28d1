use std::fmt::Display;

pub mod reader;
pub mod writer;

/// a single 8 bit color component
pub type Sample = u8;

/// Half-open column interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }
}

impl Display for ColumnRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One color channel as a row-major grid of samples.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelGrid<T> {
    samples: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> ChannelGrid<T>
where
    T: Clone + Copy,
{
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            samples: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn from_samples(width: usize, height: usize, samples: Vec<T>) -> Self {
        assert_eq!(
            samples.len(),
            width * height,
            "number of samples does not match a {}x{} grid",
            width,
            height
        );
        Self {
            samples,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn sample(&self, column_index: usize, row_index: usize) -> T {
        self.samples[column_index + row_index * self.width]
    }

    fn row(&self, row_index: usize) -> &[T] {
        let offset = row_index * self.width;
        &self.samples[offset..offset + self.width]
    }

    /// Copies the columns of `range` into a new grid of the same height.
    /// The range has to lie within the grid.
    pub fn columns(&self, range: ColumnRange) -> Self {
        let mut samples = Vec::with_capacity(range.width() * self.height);
        for row_index in 0..self.height {
            samples.extend_from_slice(&self.row(row_index)[range.start..range.end]);
        }
        Self {
            samples,
            width: range.width(),
            height: self.height,
        }
    }

    /// Overwrites the columns starting at `start` with the whole of `strip`.
    pub fn write_columns(&mut self, start: usize, strip: &ChannelGrid<T>) {
        assert_eq!(self.height, strip.height, "strip height does not match");
        for row_index in 0..self.height {
            let offset = row_index * self.width + start;
            self.samples[offset..offset + strip.width].copy_from_slice(strip.row(row_index));
        }
    }
}

impl ChannelGrid<Sample> {
    /// Integer-truncated mean of all samples, `0` for an empty grid.
    pub fn mean(&self) -> Sample {
        if self.samples.is_empty() {
            return 0;
        }
        let sum: u64 = self.samples.iter().map(|&sample| u64::from(sample)).sum();
        (sum / self.samples.len() as u64) as Sample
    }
}

/// Red, green and blue channel grids of identical shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbGrids<T> {
    red: ChannelGrid<T>,
    green: ChannelGrid<T>,
    blue: ChannelGrid<T>,
}

impl<T> RgbGrids<T>
where
    T: Clone + Copy,
{
    pub fn new(red: ChannelGrid<T>, green: ChannelGrid<T>, blue: ChannelGrid<T>) -> Self {
        assert!(
            red.width == green.width
                && red.width == blue.width
                && red.height == green.height
                && red.height == blue.height,
            "color channels differ in shape"
        );
        Self { red, green, blue }
    }

    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            red: ChannelGrid::filled(width, height, value),
            green: ChannelGrid::filled(width, height, value),
            blue: ChannelGrid::filled(width, height, value),
        }
    }

    /// Splits `[r, g, b, r, g, b, ...]` pixel data into its channels.
    pub fn from_interleaved(width: usize, height: usize, pixels: &[T]) -> Self {
        let capacity = width * height;
        let mut red = Vec::with_capacity(capacity);
        let mut green = Vec::with_capacity(capacity);
        let mut blue = Vec::with_capacity(capacity);
        for pixel in pixels.chunks_exact(3) {
            red.push(pixel[0]);
            green.push(pixel[1]);
            blue.push(pixel[2]);
        }
        Self {
            red: ChannelGrid::from_samples(width, height, red),
            green: ChannelGrid::from_samples(width, height, green),
            blue: ChannelGrid::from_samples(width, height, blue),
        }
    }

    pub fn width(&self) -> usize {
        self.red.width
    }

    pub fn height(&self) -> usize {
        self.red.height
    }

    pub fn red_channel(&self) -> &ChannelGrid<T> {
        &self.red
    }

    pub fn green_channel(&self) -> &ChannelGrid<T> {
        &self.green
    }

    pub fn blue_channel(&self) -> &ChannelGrid<T> {
        &self.blue
    }

    pub fn columns(&self, range: ColumnRange) -> Self {
        Self {
            red: self.red.columns(range),
            green: self.green.columns(range),
            blue: self.blue.columns(range),
        }
    }

    pub fn write_columns(&mut self, start: usize, strip: &RgbGrids<T>) {
        self.red.write_columns(start, &strip.red);
        self.green.write_columns(start, &strip.green);
        self.blue.write_columns(start, &strip.blue);
    }

    /// Merges the channels back into `[r, g, b, r, g, b, ...]` pixel data.
    pub fn interleave(&self) -> Vec<T> {
        let mut pixels = Vec::with_capacity(self.red.samples.len() * 3);
        for ((&red, &green), &blue) in self
            .red
            .samples
            .iter()
            .zip(&self.green.samples)
            .zip(&self.blue.samples)
        {
            pixels.extend_from_slice(&[red, green, blue]);
        }
        pixels
    }
}

impl RgbGrids<Sample> {
    pub fn means(&self) -> [Sample; 3] {
        [self.red.mean(), self.green.mean(), self.blue.mean()]
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelGrid, ColumnRange, RgbGrids};

    #[rustfmt::skip]
    const TEST_CHANNEL: &[u8] = &[
         1,  2,  3,  4,
         5,  6,  7,  8,
         9, 10, 11, 12,
    ];

    fn test_channel() -> ChannelGrid<u8> {
        ChannelGrid::from_samples(4, 3, Vec::from(TEST_CHANNEL))
    }

    #[test]
    fn sample_is_addressed_by_column_and_row() {
        let channel = test_channel();
        assert_eq!(channel.sample(2, 1), 7);
        assert_eq!(channel.sample(0, 2), 9);
    }

    #[test]
    fn columns_extracts_inner_range() {
        let strip = test_channel().columns(ColumnRange::new(1, 3));
        assert_eq!(strip.width(), 2);
        assert_eq!(strip.height(), 3);
        assert_eq!(strip.samples(), &[2, 3, 6, 7, 10, 11]);
    }

    #[test]
    fn empty_column_range_yields_empty_grid() {
        let strip = test_channel().columns(ColumnRange::new(2, 2));
        assert_eq!(strip.width(), 0);
        assert_eq!(strip.height(), 3);
        assert!(strip.samples().is_empty());
        assert_eq!(strip.mean(), 0);
    }

    #[test]
    fn write_columns_only_touches_target_columns() {
        let mut target = ChannelGrid::filled(4, 3, 0u8);
        let strip = ChannelGrid::from_samples(2, 3, vec![1, 2, 3, 4, 5, 6]);
        target.write_columns(1, &strip);
        #[rustfmt::skip]
        let expected: &[u8] = &[
            0, 1, 2, 0,
            0, 3, 4, 0,
            0, 5, 6, 0,
        ];
        assert_eq!(target.samples(), expected);
    }

    #[test]
    fn mean_is_truncated() {
        let channel = ChannelGrid::from_samples(3, 1, vec![1u8, 2, 2]);
        assert_eq!(channel.mean(), 1);
        assert_eq!(test_channel().mean(), 6);
    }

    #[test]
    fn interleaving_restores_pixel_order() {
        let pixels: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let grids = RgbGrids::from_interleaved(2, 2, &pixels);
        assert_eq!(grids.red_channel().samples(), &[1, 4, 7, 10]);
        assert_eq!(grids.green_channel().samples(), &[2, 5, 8, 11]);
        assert_eq!(grids.blue_channel().samples(), &[3, 6, 9, 12]);
        assert_eq!(grids.interleave(), pixels);
    }

    #[test]
    fn means_are_reported_per_channel() {
        let grids = RgbGrids::from_interleaved(2, 1, &[10u8, 0, 255, 21, 0, 255]);
        assert_eq!(grids.means(), [15, 0, 255]);
    }
}
