mod kv;

pub use self::kv::{
    decode_flag, decode_json, decode_text, encode_flag, encode_json, KvError, KvReply,
    StorageKey, StoreWrite, MAX_VALUE_SIZE,
};

// Crux's built-in Render covers view updates; crux_kv's KeyValue is the
// injected store the shell backs with local storage.
pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

// The Effect derive wires capabilities to `App` and `Event` by name.
#[allow(unused_imports)]
use crate::{app::App, event::Event};

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
}
