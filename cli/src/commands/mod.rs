mod favorite;
mod helpers;
mod plan;
mod recipe;
mod search;
mod shopping;

pub(crate) use favorite::{cmd_favorite_add, cmd_favorite_list};
pub(crate) use plan::{cmd_plan_add, cmd_plan_list, cmd_plan_orphans};
pub(crate) use recipe::cmd_show;
pub(crate) use search::cmd_search;
pub(crate) use shopping::{cmd_shopping_all, cmd_shopping_recipe};
