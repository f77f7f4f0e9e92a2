pub mod colors;
pub mod join;
pub mod label;
pub mod normalize;
pub mod palette;
pub mod region;
pub mod scale;

pub use join::{JoinResult, JoinSpec, KeyConflict, SourceRow, ValueField, join};
pub use normalize::normalize;
pub use palette::Palette;
pub use region::{AttrValue, GeometryRef, Region};
pub use scale::{BinStrategy, ColorScale, ScaleOptions};
