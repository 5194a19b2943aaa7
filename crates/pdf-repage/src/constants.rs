//! Shared constants for page editing and booklet imposition
//!
//! Pointer distances are in logical pixels, page geometry in PDF points.

// =============================================================================
// Sheet Sizes
// =============================================================================

/// A4 landscape (297mm × 210mm) in points
pub const A4_LANDSCAPE_PT: (f32, f32) = (841.89, 595.28);

/// US Letter landscape (11" × 8.5") in points
pub const LETTER_LANDSCAPE_PT: (f32, f32) = (792.0, 612.0);

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Used when a page carries no readable MediaBox
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Booklet Imposition
// =============================================================================

/// Each folded sheet carries two faces of two pages
pub const PAGES_PER_SHEET: usize = 4;

/// Signatures thicker than this are hard to fold and staple
pub const SPLIT_WARNING_SHEETS: usize = 20;

/// Sheets per signature suggested when splitting is recommended
pub const DEFAULT_SHEETS_PER_PART: usize = 12;

// =============================================================================
// Drag Reordering
// =============================================================================

/// Pointer travel (Chebyshev distance) before a press becomes a drag
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

/// Height of the autoscroll band inside the top and bottom viewport edges
pub const AUTOSCROLL_EDGE_PX: f32 = 25.0;

/// Scroll distance per autoscroll tick
pub const AUTOSCROLL_STEP_PX: f32 = 20.0;

/// Suggested interval between autoscroll ticks
pub const AUTOSCROLL_INTERVAL_MS: u64 = 20;

/// Horizontal gutter around thumbnails when computing grid columns
pub const GRID_GUTTER_PX: f32 = 30.0;

// =============================================================================
// Compression Presets
// =============================================================================

/// JPEG quality for the screen-oriented preset
pub const WEB_JPEG_QUALITY: u8 = 70;

/// Longest image side for the screen-oriented preset
pub const WEB_MAX_SIDE_PX: u32 = 1200;

/// JPEG quality for the print-oriented preset
pub const PRINT_JPEG_QUALITY: u8 = 85;

/// Longest image side for the print-oriented preset
pub const PRINT_MAX_SIDE_PX: u32 = 2400;
