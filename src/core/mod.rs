pub mod canvas;
pub mod plot_rect;
pub mod ticks;
pub mod types;
pub mod value_scale;

pub use canvas::{Axis, Canvas, POINTS_PER_INCH};
pub use plot_rect::PlotRect;
pub use ticks::{TickFormat, TickValue, format_tick_value, value_axis_ticks};
pub use types::{PixelRect, TextExtent};
pub use value_scale::{ScaleMode, ValueScale};
