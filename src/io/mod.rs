#[cfg(feature = "compression")]
pub mod compression;
pub mod gtf;
