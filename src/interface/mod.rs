pub mod prompts;
pub mod render;

pub use prompts::{
    PlayerAction, find_recipes, prompt_action, prompt_recipe, prompt_station, prompt_wait_secs,
    prompt_yes_no,
};
pub use render::{
    display_catalog, display_events, display_game_over, display_kitchen, display_menu,
    display_recipe, display_status,
};
