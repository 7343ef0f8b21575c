mod bootstrap;

pub(crate) use bootstrap::{apply_env_overrides, init_tracing, parse_args, run};
