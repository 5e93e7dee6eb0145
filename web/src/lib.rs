use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod scheduler;
mod source;
mod utils;

/// Options read from the page's location hash, e.g. `#--seed=42&-vv`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

fn parse_args(location_hash: &str) -> Result<Args, clap::Error> {
    Args::try_parse_from(location_hash.split(['#', '&']))
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();
    let args = parse_args(&location_hash).map_err(|err| JsValue::from_str(&err.to_string()))?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
    }
    log::debug!("args: {:?}", args.game);

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| JsValue::from_str("missing #game element"))?;

    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
    log::debug!("memory game mounted");
    Ok(())
}
