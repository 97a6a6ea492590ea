mod login;
mod logout;
mod orgs;
mod serve;
mod status;

pub use login::run_login;
pub use logout::run_logout;
pub use orgs::run_orgs;
pub use serve::run_serve;
pub use status::run_status;
