mod report;

pub use report::{render_history, render_markdown, write_report};
