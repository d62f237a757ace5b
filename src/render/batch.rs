use rayon::prelude::*;

use crate::foundation::core::{BoundingBox, Raster};
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::render::fit::cover_fit;
use crate::render::pipeline::{CompositeOutput, CompositorOpts, Recipe, render};

/// Result of one background variation.
#[derive(Debug)]
pub enum VariationOutcome {
    /// The pipeline succeeded.
    Composited(CompositeOutput),
    /// The pipeline failed; `background` is the canvas-fitted background without the subject.
    Fallback {
        /// Uncomposited background.
        background: Raster,
        /// Why compositing failed.
        error: ThumbError,
    },
}

impl VariationOutcome {
    /// Whether the subject made it onto this variation.
    pub fn composited(&self) -> bool {
        matches!(self, VariationOutcome::Composited(out) if out.composited)
    }

    /// The raster to hand back to the caller.
    pub fn image(&self) -> &Raster {
        match self {
            VariationOutcome::Composited(out) => &out.image,
            VariationOutcome::Fallback { background, .. } => background,
        }
    }

    /// Subject placement, when composited.
    pub fn placement(&self) -> Option<BoundingBox> {
        match self {
            VariationOutcome::Composited(out) => Some(out.placement),
            VariationOutcome::Fallback { .. } => None,
        }
    }
}

/// Composite `cutout` onto every background with the same recipe.
///
/// Variations run in parallel and come back in input order. A failing variation degrades to a
/// [`VariationOutcome::Fallback`] without affecting its siblings. Invalid options are an error
/// before any variation runs, as is a background that cannot be fitted for its fallback.
#[tracing::instrument(skip_all, fields(variations = backgrounds.len()))]
pub fn render_variations(
    backgrounds: &[Raster],
    cutout: &Raster,
    recipe: &Recipe,
    opts: &CompositorOpts,
) -> ThumbResult<Vec<VariationOutcome>> {
    opts.validate()?;
    let pool = build_thread_pool(opts.threads)?;
    pool.install(|| {
        backgrounds
            .par_iter()
            .enumerate()
            .map(|(idx, background)| run_variation(idx, background, cutout, recipe, opts))
            .collect()
    })
}

fn run_variation(
    idx: usize,
    background: &Raster,
    cutout: &Raster,
    recipe: &Recipe,
    opts: &CompositorOpts,
) -> ThumbResult<VariationOutcome> {
    match render(background, cutout, recipe, opts) {
        Ok(out) => Ok(VariationOutcome::Composited(out)),
        Err(error) => {
            tracing::warn!(variation = idx, %error, "variation falls back to background");
            let background =
                cover_fit(background, opts.canvas, opts.resize_filter).map_err(|fit_error| {
                    ThumbError::compositing(format!(
                        "variation {idx}: fallback fit failed ({fit_error}) after: {error}"
                    ))
                })?;
            Ok(VariationOutcome::Fallback { background, error })
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ThumbResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ThumbError::validation(
            "variation 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ThumbError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
