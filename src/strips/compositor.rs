use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use super::blend::{blend, blend_window, BlendMethod};
use super::layout::StripLayout;
use crate::error::Error;
use crate::raster::reader::StripReader;
use crate::raster::{ColumnRange, RgbGrids, Sample};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionOptions {
    pub averaging: bool,
    pub blend_method: BlendMethod,
    pub number_of_threads: usize,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            averaging: true,
            blend_method: BlendMethod::FloorThenSum,
            number_of_threads: 1,
        }
    }
}

/// Progress information for one finished strip.
#[derive(Clone, Debug, PartialEq)]
pub struct StripReport {
    /// zero based
    pub index: usize,
    pub count: usize,
    pub file_name: String,
    pub range: ColumnRange,
    pub mean: [Sample; 3],
}

impl StripReport {
    fn new(
        index: usize,
        count: usize,
        source: &Path,
        range: ColumnRange,
        strip: &RgbGrids<Sample>,
    ) -> Self {
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        Self {
            index,
            count,
            file_name,
            range,
            mean: strip.means(),
        }
    }
}

impl Display for StripReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [mean_red, mean_green, mean_blue] = self.mean;
        write!(
            f,
            "Processed image {} of {}: {}, {}px to {}px, mean RGB: ({}, {}, {})",
            self.index + 1,
            self.count,
            self.file_name,
            self.range.start,
            self.range.end as i64 - 1,
            mean_red,
            mean_green,
            mean_blue
        )
    }
}

/// Receives strip reports in index order.
pub trait ProgressObserver {
    fn strip_processed(&mut self, report: &StripReport);
}

pub struct StdoutProgress;

impl ProgressObserver for StdoutProgress {
    fn strip_processed(&mut self, report: &StripReport) {
        println!("{}", report);
    }
}

impl ProgressObserver for Vec<StripReport> {
    fn strip_processed(&mut self, report: &StripReport) {
        self.push(report.clone());
    }
}

/// Assembles the output image from one vertical strip per source.
pub struct StripCompositor<R> {
    reader: Arc<R>,
    options: CompositionOptions,
}

impl<R> StripCompositor<R>
where
    R: StripReader + Send + Sync + 'static,
{
    pub fn new(reader: R, options: CompositionOptions) -> Self {
        Self {
            reader: Arc::new(reader),
            options,
        }
    }

    /// Builds the full-width image from `sources`, taken in the given order.
    /// The first source determines the output dimensions. Any failing strip
    /// aborts the whole composition.
    pub fn compose(
        &self,
        sources: &[PathBuf],
        observer: &mut dyn ProgressObserver,
    ) -> Result<RgbGrids<Sample>> {
        let first_source = sources.first().ok_or(Error::EmptySourceList)?;
        let (image_width, image_height) = self.reader.dimensions(first_source)?;
        let layout = StripLayout::new(image_width, sources.len())?;
        log::info!(
            "Composing {}x{} image from {} sources, strip width {}px",
            image_width,
            image_height,
            layout.number_of_strips(),
            layout.strip_width()
        );
        let mut assembled = RgbGrids::filled(image_width, image_height, 0);
        let number_of_threads = self.options.number_of_threads.min(layout.number_of_strips());
        if number_of_threads <= 1 {
            self.compose_sequentially(sources, layout, image_height, &mut assembled, observer)?;
        } else {
            self.compose_in_parallel(
                sources,
                layout,
                image_height,
                number_of_threads,
                &mut assembled,
                observer,
            )?;
        }
        Ok(assembled)
    }

    fn compose_sequentially(
        &self,
        sources: &[PathBuf],
        layout: StripLayout,
        image_height: usize,
        assembled: &mut RgbGrids<Sample>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        for index in 0..layout.number_of_strips() {
            let strip = compute_strip(
                self.reader.as_ref(),
                sources,
                layout,
                index,
                image_height,
                &self.options,
            )?;
            let range = layout.range(index);
            assembled.write_columns(range.start, &strip);
            observer.strip_processed(&StripReport::new(
                index,
                layout.number_of_strips(),
                &sources[index],
                range,
                &strip,
            ));
        }
        Ok(())
    }

    fn compose_in_parallel(
        &self,
        sources: &[PathBuf],
        layout: StripLayout,
        image_height: usize,
        number_of_threads: usize,
        assembled: &mut RgbGrids<Sample>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        log::debug!("Computing strips on {} threads", number_of_threads);
        let threadpool = ThreadPool::new(number_of_threads);
        let cancelled = Arc::new(AtomicBool::new(false));
        let shared_sources: Arc<[PathBuf]> = sources.into();
        let (sender, receiver) = mpsc::channel();
        for index in 0..layout.number_of_strips() {
            let sender = sender.clone();
            let reader = Arc::clone(&self.reader);
            let sources = Arc::clone(&shared_sources);
            let cancelled = Arc::clone(&cancelled);
            let options = self.options;
            threadpool.execute(move || {
                if cancelled.load(Ordering::Acquire) {
                    return;
                }
                let result = compute_strip(
                    reader.as_ref(),
                    &sources,
                    layout,
                    index,
                    image_height,
                    &options,
                );
                // results sent after a failure are never collected
                let _ = sender.send((index, result));
            });
        }
        drop(sender);

        let result = Self::collect_strips(sources, layout, &receiver, assembled, observer);
        if result.is_err() {
            cancelled.store(true, Ordering::Release);
            // no source may be read after the composition has failed
            threadpool.join();
        }
        result
    }

    fn collect_strips(
        sources: &[PathBuf],
        layout: StripLayout,
        receiver: &mpsc::Receiver<(usize, Result<RgbGrids<Sample>>)>,
        assembled: &mut RgbGrids<Sample>,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let mut pending_reports = BTreeMap::new();
        let mut next_report_index = 0;
        for _ in 0..layout.number_of_strips() {
            let (index, result) = receiver
                .recv()
                .map_err(|_| Error::WorkerDisconnected(next_report_index))?;
            let strip = result?;
            let range = layout.range(index);
            assembled.write_columns(range.start, &strip);
            pending_reports.insert(
                index,
                StripReport::new(
                    index,
                    layout.number_of_strips(),
                    &sources[index],
                    range,
                    &strip,
                ),
            );
            while let Some(report) = pending_reports.remove(&next_report_index) {
                observer.strip_processed(&report);
                next_report_index += 1;
            }
        }
        Ok(())
    }
}

fn read_checked_strip<R: StripReader + ?Sized>(
    reader: &R,
    source: &Path,
    range: ColumnRange,
    image_height: usize,
) -> Result<RgbGrids<Sample>> {
    let strip = reader.read_strip(source, Some(range))?;
    if strip.height() != image_height {
        return Err(Error::HeightMismatch {
            path: source.display().to_string(),
            expected: image_height,
            actual: strip.height(),
        });
    }
    Ok(strip)
}

fn compute_strip<R: StripReader + ?Sized>(
    reader: &R,
    sources: &[PathBuf],
    layout: StripLayout,
    index: usize,
    image_height: usize,
    options: &CompositionOptions,
) -> Result<RgbGrids<Sample>> {
    let range = layout.range(index);
    let window = if options.averaging {
        blend_window(index, sources.len())
    } else {
        None
    };
    match window {
        Some(window) => {
            log::debug!(
                "Blending strip {} ({}) from sources {:?}",
                index,
                range,
                window
            );
            let strips = window
                .iter()
                .map(|&neighbour| {
                    read_checked_strip(reader, &sources[neighbour], range, image_height)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(blend(
                options.blend_method,
                [&strips[0], &strips[1], &strips[2], &strips[3], &strips[4]],
            ))
        }
        None => {
            log::debug!("Copying strip {} ({})", index, range);
            read_checked_strip(reader, &sources[index], range, image_height)
        }
    }
}
