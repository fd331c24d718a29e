pub mod compositor;
pub mod export;
pub mod gesture;
pub mod instructions;
pub mod overlay;
pub mod raster;
pub mod session;
pub mod skeleton;
pub mod state;

pub use instructions::{InstructionBoard, InstructionPresenter, Tone};
pub use overlay::StrokeStyle;
pub use session::{SketchSession, parse_color};
