//! # File Handles
//!
//! One handle per persistence file. A handle only holds the path; every
//! call opens the file, does a single read or write and closes it again.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.catalog()   ──► CatalogFile   ──► load()                         │
//! │  store.discounts() ──► DiscountFile  ──► load()                         │
//! │  store.cart()      ──► CartFile      ──► save() / load() / clear()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`CatalogFile`] - `Products.txt`, read once at startup
//! - [`DiscountFile`] - `Discount.txt`, read once at startup
//! - [`CartFile`] - `Cart.txt`, saved on demand, restored then cleared

pub mod cart;
pub mod catalog;
pub mod discount;

pub use cart::CartFile;
pub use catalog::CatalogFile;
pub use discount::DiscountFile;
