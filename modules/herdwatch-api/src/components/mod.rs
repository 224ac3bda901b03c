pub mod dashboard;
pub mod layout;

pub use dashboard::{render_dashboard, DashboardData};
