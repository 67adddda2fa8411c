pub(crate) mod fighter_model;
