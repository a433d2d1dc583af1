mod nav;

pub use nav::NavController;
