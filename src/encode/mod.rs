/// Text, SVG and raster exports of a rendition.
pub mod export;
