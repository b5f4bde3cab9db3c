use thiserror::Error;

/// Failures the graph view can recover from locally.
///
/// None of these reach the host as a panic: data errors fall back to an empty
/// index and surface errors abort the current rebuild only.
#[derive(Error, Debug)]
pub enum GraphError {
	/// Bundled relation or translation data could not be parsed.
	#[error("malformed bundled data: {0}")]
	Data(#[from] serde_json::Error),

	/// The canvas is not mounted in the document.
	#[error("graph surface is not attached to the document")]
	DetachedSurface,

	/// The canvas container has no usable area.
	#[error("graph surface has zero size ({width}x{height})")]
	EmptySurface {
		/// Measured width in CSS pixels.
		width: f64,
		/// Measured height in CSS pixels.
		height: f64,
	},

	/// The browser refused a 2d drawing context.
	#[error("2d drawing context unavailable")]
	Context,
}
