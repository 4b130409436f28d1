use crate::error::Error;
use crate::raster::ColumnRange;
use crate::Result;

/// Partition of the output width into one contiguous strip per source.
///
/// Every strip is `image_width / number_of_strips` columns wide, except the
/// last one which extends to `image_width` and absorbs the remainder. With
/// more strips than columns all but the last strip are empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripLayout {
    image_width: usize,
    number_of_strips: usize,
}

impl StripLayout {
    pub fn new(image_width: usize, number_of_strips: usize) -> Result<Self> {
        if number_of_strips == 0 {
            return Err(Error::EmptySourceList);
        }
        Ok(Self {
            image_width,
            number_of_strips,
        })
    }

    pub fn number_of_strips(&self) -> usize {
        self.number_of_strips
    }

    pub fn strip_width(&self) -> usize {
        self.image_width / self.number_of_strips
    }

    pub fn range(&self, index: usize) -> ColumnRange {
        let strip_width = self.strip_width();
        let start = index * strip_width;
        let end = if index == self.number_of_strips - 1 {
            self.image_width
        } else {
            (index + 1) * strip_width
        };
        ColumnRange::new(start, end)
    }

    pub fn iter(&self) -> impl Iterator<Item = ColumnRange> + '_ {
        (0..self.number_of_strips).map(|index| self.range(index))
    }
}
