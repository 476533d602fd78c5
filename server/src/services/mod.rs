pub mod page_cache_evictor;
pub mod roster_loader;
