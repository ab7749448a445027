use named_env::{
    namespace, optional_boolean, optional_integer, optional_path_list, required_string,
    SharedSource,
};
use serde::Deserialize;

namespace! {
    /// Settings of a small web service.
    pub struct ServiceEnv {
        database_url: String = required_string()
            .description("Connection string, e.g. postgres://user@host/db"),
        port: i64 = optional_integer(8080),
        debug: bool = optional_boolean("no"),
        stage: String = required_string().allowed(["dev", "prod"]),
        plugin_path: Vec<std::path::PathBuf> = optional_path_list("/usr/lib/service"),
    }
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Settings {
    database_url: String,
    port: u16,
    debug: bool,
    stage: String,
    plugin_path: Vec<std::path::PathBuf>,
}

fn main() -> Result<(), named_env::Error> {
    let source = SharedSource::from_pairs([
        ("DATABASE_URL", "postgres://app@localhost/app"),
        ("DEBUG", "yes"),
        ("STAGE", "dev"),
    ]);
    let mut env = ServiceEnv::with_source(source.clone());

    println!("Listening on port {} (debug={})", env.port()?, env.debug()?);

    // Cached: later changes to the source are not seen.
    source.insert("PORT", "9090");
    println!("Port after source change: {}", env.port()?);

    let settings: Settings = env.extract()?;
    println!("{settings:#?}");

    // The type-level instance reads the real process environment.
    match ServiceEnv::with_global(|env| env.database_url()) {
        Ok(url) => println!("Process DATABASE_URL: {url}"),
        Err(err) => println!("Missing variable:\n{err}"),
    }

    Ok(())
}
