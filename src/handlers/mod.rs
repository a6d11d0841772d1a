// Route handlers, one module per resource. Reads are public; mutations are
// wrapped in `ensure_admin` when the router is assembled in `app.rs`.
pub mod companies;
pub mod jobs;
pub mod root;
