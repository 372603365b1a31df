mod keys;

pub use keys::list_key;
