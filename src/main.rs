use nu_plugin::{serve_plugin, MsgPackSerializer};
use nu_plugin_symnmf::SymNmfPlugin;

fn main() {
    serve_plugin(&SymNmfPlugin, MsgPackSerializer {})
}
