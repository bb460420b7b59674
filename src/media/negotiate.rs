use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::media::family::{Conversion, MediaType};
use crate::media::registry::MediaRegistry;
use crate::media::representation::BoxRepresentation;

/// How a representation is chosen among acceptable content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// The first candidate, in request order, that converts wins.
    #[default]
    FirstMatch,
    /// The convertible candidate whose family has the highest quality factor
    /// wins; ties go to the earlier candidate.
    Quality,
}

/// Rewrites a representation into a family the client prefers.
#[derive(Debug, Clone)]
pub struct Negotiator {
    registry: Arc<MediaRegistry>,
    selection: Selection,
}

impl Negotiator {
    pub fn new(registry: Arc<MediaRegistry>, selection: Selection) -> Self {
        Self {
            registry,
            selection,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the negotiated representation, or `rep` untouched when no
    /// candidate converts.
    pub fn negotiate(&self, rep: BoxRepresentation, candidates: &[String]) -> BoxRepresentation {
        match self.selection {
            Selection::FirstMatch => self.first_match(rep, candidates),
            Selection::Quality => self.best_quality(rep, candidates),
        }
    }

    fn first_match(&self, rep: BoxRepresentation, candidates: &[String]) -> BoxRepresentation {
        for (candidate, media) in self.recognised(candidates) {
            match media.convert(rep.as_ref()) {
                Conversion::Identity => {
                    debug!(candidate, "representation already in accepted family");
                    return rep;
                }
                Conversion::Converted(alt) => {
                    debug!(candidate, "negotiated alternative representation");
                    return alt;
                }
                Conversion::Incompatible => {}
            }
        }

        debug!(?candidates, "no acceptable family converts, keeping representation");
        rep
    }

    fn best_quality(&self, rep: BoxRepresentation, candidates: &[String]) -> BoxRepresentation {
        // `None` in the second slot means the original representation.
        let mut best: Option<(f32, Option<BoxRepresentation>)> = None;

        for (candidate, media) in self.recognised(candidates) {
            let quality = media.quality();
            if best.as_ref().is_some_and(|(q, _)| quality <= *q) {
                continue;
            }

            match media.convert(rep.as_ref()) {
                Conversion::Identity => best = Some((quality, None)),
                Conversion::Converted(alt) => best = Some((quality, Some(alt))),
                Conversion::Incompatible => continue,
            }
            debug!(candidate, quality, "best candidate so far");
        }

        match best {
            Some((_, Some(alt))) => alt,
            _ => rep,
        }
    }

    fn recognised<'a>(
        &'a self,
        candidates: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a MediaType)> + 'a {
        candidates.iter().filter_map(|candidate| {
            self.registry
                .lookup(candidate)
                .map(|media| (candidate.as_str(), media))
        })
    }
}
