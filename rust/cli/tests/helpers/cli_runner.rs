use lowdraw_cli::config::{CONFIG_ENV, POLICY_ENV, SEED_ENV, STACK_ENV, TIE_RULE_ENV};

#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Default)]
pub struct CliRunner;

impl CliRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let argv = std::iter::once("lowdraw").chain(args.iter().copied());
        let exit_code = lowdraw_cli::run(argv, &mut out, &mut err);
        CliResult {
            exit_code,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        }
    }

    #[allow(dead_code)]
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        let _guard = EnvGuard::apply(env);
        self.run(args)
    }
}

/// Clears every `LOWDRAW_*` variable, applies `pairs`, and restores the
/// previous values when dropped.
#[derive(Debug)]
pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for key in [CONFIG_ENV, SEED_ENV, STACK_ENV, TIE_RULE_ENV, POLICY_ENV] {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
        for (key, value) in pairs {
            if !restores.iter().any(|(k, _)| k == key) {
                restores.push((key.to_string(), std::env::var(key).ok()));
            }
            unsafe {
                std::env::set_var(key, value);
            }
        }
        EnvGuard { restores }
    }

    #[allow(dead_code)]
    pub fn clean() -> Self {
        Self::apply(&[])
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            unsafe {
                match previous {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
