use geo::EuclideanDistance;
use geo_types::{Coord, Point};

use crate::{
    config::FillConfig,
    raster::PixelTransform,
    traits::PathSnapper,
    types::{Contour, Heading, PathSnap, Section},
};

/// Folds snapped contour pixels into arc-length sections.
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    /// Largest arc-length jump, relative to the pixel step, that still
    /// continues the open section.
    pub jump_factor: f64,
    /// Samples snapped farther than this are ignored.
    pub max_snap_distance: Option<f64>,
}

impl Default for SectionBuilder {
    fn default() -> Self {
        Self::from_config(&FillConfig::default())
    }
}

impl SectionBuilder {
    pub fn from_config(config: &FillConfig) -> Self {
        Self {
            jump_factor: config.jump_factor,
            max_snap_distance: config.max_snap_distance,
        }
    }

    /// Snaps every contour pixel and groups the samples into sections.
    ///
    /// Pixels that do not snap to any path are dropped. When the trace began
    /// in the middle of a section, the pieces at both ends of the sequence
    /// are joined again.
    pub fn build<S: PathSnapper + ?Sized>(
        &self,
        contour: &Contour,
        transform: &PixelTransform,
        snapper: &S,
    ) -> Vec<Section> {
        if contour.is_empty() {
            return Vec::new();
        }
        let mut sections: Vec<Section> = Vec::new();
        let mut previous: Option<Coord<f64>> = None;

        for &pixel in &contour.points {
            let position = transform.pixel_to_scene(pixel);
            let step = previous.map_or(0.0, |p| distance(p, position));
            previous = Some(position);

            let Some(snap) = snapper.snap_to_path(position) else {
                continue;
            };
            if self.max_snap_distance.is_some_and(|max| snap.distance > max) {
                continue;
            }

            match sections.last_mut() {
                Some(open) if !self.breaks(open, &snap, step) => open.end = snap.clen,
                _ => sections.push(Section::at(snap.object, snap.clen)),
            }
        }

        if let (Some(&first), Some(&last)) = (contour.points.first(), contour.points.last()) {
            let seam = distance(transform.pixel_to_scene(last), transform.pixel_to_scene(first));
            self.join_seam(&mut sections, seam);
        }
        sections
    }

    /// Whether `snap` must open a new section instead of extending `open`.
    fn breaks(&self, open: &Section, snap: &PathSnap, step: f64) -> bool {
        snap.object != open.object
            || open.span() * (snap.clen - open.end) < 0.0
            || (snap.clen - open.end).abs() > self.jump_factor * step
    }

    fn join_seam(&self, sections: &mut Vec<Section>, seam: f64) {
        if sections.len() < 2 {
            return;
        }
        let (first, last) = (sections[0], sections[sections.len() - 1]);
        let continues = first.object == last.object
            && last.span() * (first.start - last.end) >= 0.0
            && last.span() * first.span() >= 0.0
            && (first.start - last.end).abs() <= self.jump_factor * seam;
        if continues {
            sections[0] = Section {
                object: first.object,
                start: last.start,
                end: first.end,
            };
            sections.pop();
        }
    }
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Point::from(a).euclidean_distance(&Point::from(b))
}

/// Removes back-and-forth noise from a section sequence.
#[derive(Debug, Clone)]
pub struct SectionCleaner {
    /// Adjacent sections whose ends are closer than this may be merged.
    pub merge_distance: f64,
    /// Arc-length added to zero-length sections.
    pub widen_epsilon: f64,
}

impl SectionCleaner {
    pub fn new(pixel_length: f64, config: &FillConfig) -> Self {
        Self {
            merge_distance: config.backtrack_factor * pixel_length,
            widen_epsilon: config.widen_epsilon,
        }
    }

    pub fn clean(&self, sections: Vec<Section>) -> Vec<Section> {
        let mut cleaned: Vec<Section> = Vec::with_capacity(sections.len());
        for section in sections {
            let mut current = section;
            // A merge may create a new backtrack with the entry before it.
            while let Some(&prev) = cleaned.last() {
                if !self.is_backtrack(&prev, &current) {
                    break;
                }
                current = merge(prev, current);
                cleaned.pop();
            }
            cleaned.push(current);
        }

        for section in &mut cleaned {
            if section.start == section.end {
                section.end += self.widen_epsilon;
            }
        }
        cleaned
    }

    fn is_backtrack(&self, prev: &Section, cur: &Section) -> bool {
        // Widened sections stay stationary on a second pass.
        let tolerance = 2.0 * self.widen_epsilon;
        let opposite = matches!(
            (prev.heading(tolerance), cur.heading(tolerance)),
            (Heading::Forward, Heading::Backward) | (Heading::Backward, Heading::Forward)
        );
        prev.object == cur.object && opposite && (cur.start - prev.end).abs() < self.merge_distance
    }
}

fn merge(prev: Section, cur: Section) -> Section {
    let (lo, hi) = prev.bounds();
    if (lo..=hi).contains(&cur.end) {
        Section { end: cur.end, ..prev }
    } else {
        Section { start: prev.start, ..cur }
    }
}
