pub mod contract;
pub mod price;
pub mod profile;
pub mod recommendation;
pub mod sentiment;
