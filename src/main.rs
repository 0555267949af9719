use std::io::Read;
use std::path::PathBuf;
use clap::Parser;
use log::debug;
use storyprompt::request::showcase_requests;
use storyprompt::{
  compose_prompt, Error, GeneratorConfig, OpenAiClient, PromptComposer,
  PromptRequest, PromptStyle, Style, Tone,
};

/// Write a story prompt and let a language model run with it
#[derive(Debug, Parser)]
#[command(name = "storyprompt", version)]
struct Cli
{   /// Genre, plot seed or question; read from stdin when omitted
    input: Option<String>

  , /// "First Sentence" or "Question"
    #[arg(long)]
    prompt_style: Option<PromptStyle>

  , /// Neutral, Formal, Informal or Poetic
    #[arg(long)]
    style: Option<Style>

  , /// Informative, Happy, Sad or Mysterious
    #[arg(long)]
    tone: Option<Tone>

  , /// Sampling temperature, 0.0 to 1.0
    #[arg(long)]
    temperature: Option<f32>

  , /// Model identifier
    #[arg(long)]
    model: Option<String>

  , /// OpenAI-compatible API base URL
    #[arg(long)]
    api_base: Option<String>

  , /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>

  , /// Run one of the built-in example requests (1-based)
    #[arg(long, conflicts_with = "input")]
    example: Option<usize>

  , /// List the built-in example requests and exit
    #[arg(long)]
    list_examples: bool

  , /// Print the composed prompt instead of calling the model
    #[arg(long)]
    dry_run: bool

  , /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool
}

fn init_logging(verbose: bool)
{   let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or(default_level)
    ).init();
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig, Error>
{   load_config_from(cli, |name| std::env::var(name).ok())
}

/// File, then environment, then flags. Validation runs last so a
/// flag can replace a bad value from the file.
fn load_config_from<F>(cli: &Cli, lookup: F) -> Result<GeneratorConfig, Error>
where
    F: Fn(&str) -> Option<String>
{   let mut config = match &cli.config
    {   Some(path) => GeneratorConfig::from_file(path)?
      , None => GeneratorConfig::default()
    }.with_overrides_from(lookup);

    if let Some(model) = &cli.model
    {   config.model = model.clone();
    }
    if let Some(api_base) = &cli.api_base
    {   config.api_base = api_base.clone();
    }
    if let Some(prompt_style) = cli.prompt_style
    {   config.defaults.prompt_style = prompt_style;
    }
    if let Some(style) = cli.style
    {   config.defaults.style = style;
    }
    if let Some(tone) = cli.tone
    {   config.defaults.tone = tone;
    }
    if let Some(temperature) = cli.temperature
    {   config.defaults.temperature = temperature;
    }
    config.validate()?;
    Ok(config)
}

fn read_input<R: Read>(mut reader: R) -> Result<String, Error>
{   let mut input = String::new();
    reader.read_to_string(&mut input)?;
    // drop only the newline a shell or pipe appends
    if input.ends_with('\n')
    {   input.pop();
        if input.ends_with('\r')
        {   input.pop();
        }
    }
    Ok(input)
}

fn showcase_request(n: usize) -> Result<PromptRequest, Error>
{   showcase_requests()
      .into_iter()
      .nth(n.wrapping_sub(1))
      .ok_or_else(|| Error::InvalidValue
        {   kind: "example"
          , value: n.to_string()
        })
}

fn build_request(cli: &Cli, config: &GeneratorConfig)
  -> Result<PromptRequest, Error>
{   let Some(n) = cli.example else
    {   let input = match &cli.input
        {   Some(input) => input.clone()
          , None => read_input(std::io::stdin().lock())?
        };
        return PromptRequest::from_defaults(input, &config.defaults);
    };

    // flags given alongside an example replace its own settings
    let mut request = showcase_request(n)?;
    if let Some(prompt_style) = cli.prompt_style
    {   request = request.with_prompt_style(prompt_style);
    }
    if let Some(style) = cli.style
    {   request = request.with_style(style);
    }
    if let Some(tone) = cli.tone
    {   request = request.with_tone(tone);
    }
    if let Some(temperature) = cli.temperature
    {   request = request.with_temperature(temperature)?;
    }
    Ok(request)
}

fn list_examples()
{   for (i, request) in showcase_requests().iter().enumerate()
    {   println!(
          "{}. {:?} [{}, {}, {}, temperature {}]"
        , i + 1
        , request.user_input()
        , request.prompt_style()
        , request.style()
        , request.tone()
        , request.temperature()
        );
    }
}

async fn run(cli: Cli) -> Result<(), Error>
{   if cli.list_examples
    {   list_examples();
        return Ok(());
    }

    let config = load_config(&cli)?;
    let request = build_request(&cli, &config)?;
    debug!("Request: {:?}", request);

    if cli.dry_run
    {   println!("{}", compose_prompt(&request));
        return Ok(());
    }

    let client = OpenAiClient::from_config(&config)?;
    let composer = PromptComposer::new(&client, config.model.clone());
    let story = composer.compose_and_generate(&request).await?;
    println!("{}", story);
    Ok(())
}

/// Process exit status for the outcome of `run`
fn exit_code(result: &Result<(), Error>) -> i32
{   match result
    {   Ok(()) => 0
      , Err(e) => {
          debug!("Run failed: {:?}", e);
          eprintln!("storyprompt: {}", e);
          1
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main()
{   let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = exit_code(&run(cli).await);
    if code != 0
    {   std::process::exit(code);
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn cli(args: &[&str]) -> Cli
    {   Cli::try_parse_from(
          std::iter::once("storyprompt").chain(args.iter().copied())
        ).unwrap()
    }

    fn no_env(_: &str) -> Option<String>
    {   None
    }

    fn write_config(name: &str, json: &str) -> PathBuf
    {   let path = std::env::temp_dir().join(format!(
          "storyprompt-{}-{}.json",
          name,
          std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn flags_override_file_and_environment()
    {   let path = write_config("layering", r#"{
          "model": "file-model",
          "api_base": "http://file.invalid/v1",
          "defaults": { "tone": "Sad", "style": "Poetic" }
        }"#);
        let path_arg = path.to_string_lossy().to_string();

        let env = |name: &str| match name
        {   "STORYPROMPT_MODEL" => Some("env-model".to_string())
          , "STORYPROMPT_API_BASE" => Some("http://env.invalid/v1".to_string())
          , _ => None
        };

        let config = load_config_from(
          &cli(&["--config", path_arg.as_str(), "x"])
        , env
        ).unwrap();
        assert_eq!(config.model, "env-model");
        assert_eq!(config.api_base, "http://env.invalid/v1");
        assert_eq!(config.defaults.tone, Tone::Sad);

        let config = load_config_from(
          &cli(&[
            "--config", path_arg.as_str()
          , "--model", "flag-model"
          , "--tone", "Happy"
          , "--prompt-style", "Question"
          , "x"
          ])
        , env
        ).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.model, "flag-model");
        assert_eq!(config.api_base, "http://env.invalid/v1");
        assert_eq!(config.defaults.tone, Tone::Happy);
        assert_eq!(config.defaults.style, Style::Poetic);
        assert_eq!(config.defaults.prompt_style, PromptStyle::Question);
    }

    #[test]
    fn temperature_flag_replaces_bad_file_default()
    {   let path = write_config("bad-temp", r#"{"defaults":{"temperature":3}}"#);
        let path_arg = path.to_string_lossy().to_string();

        let err = assert_err!(
          load_config_from(&cli(&["--config", path_arg.as_str(), "x"]), no_env)
        );
        assert_eq!(err, Error::InvalidTemperature(3.0));

        let args = cli(&["--config", path_arg.as_str(), "--temperature", "0.5", "x"]);
        let config = assert_ok!(load_config_from(&args, no_env));
        let _ = std::fs::remove_file(&path);

        let request = assert_ok!(build_request(&args, &config));
        assert_eq!(request.temperature(), 0.5);
        assert_eq!(request.user_input(), "x");
    }

    #[test]
    fn out_of_range_temperature_flag_is_rejected()
    {   let args = cli(&["--example", "2", "--temperature", "1.5"]);
        let err = assert_err!(load_config_from(&args, no_env));
        assert_eq!(err, Error::InvalidTemperature(1.5));
        assert_err!(build_request(&args, &GeneratorConfig::default()));
    }

    #[test]
    fn positional_input_uses_config_defaults()
    {   let args = cli(&["--style", "formal", "a talking cat"]);
        let config = load_config_from(&args, no_env).unwrap();
        let request = build_request(&args, &config).unwrap();
        assert_eq!(request.user_input(), "a talking cat");
        assert_eq!(request.style(), Style::Formal);
        assert_eq!(request.tone(), Tone::Informative);
        assert_eq!(request.temperature(), 0.7);
    }

    #[test]
    fn read_input_strips_one_trailing_newline()
    {   assert_eq!(read_input(b"x\r\n".as_slice()), Ok("x".to_string()));
        assert_eq!(read_input(b"x\n\n".as_slice()), Ok("x\n".to_string()));
        assert_eq!(read_input(b"a talking cat\n".as_slice()), Ok("a talking cat".to_string()));
        assert_eq!(read_input(b"  x  ".as_slice()), Ok("  x  ".to_string()));
        assert_eq!(read_input(b"".as_slice()), Ok(String::new()));
    }

    #[test]
    fn examples_are_one_based()
    {   let first = assert_ok!(showcase_request(1));
        assert_eq!(
          first.user_input()
        , "A cyberpunk thriller set in a neon-lit city."
        );
        assert_eq!(
          assert_ok!(showcase_request(2)).tone()
        , Tone::Happy
        );

        for n in [0, 3]
        {   assert_eq!(
              showcase_request(n)
            , Err(Error::InvalidValue
              {   kind: "example"
                , value: n.to_string()
              })
            );
        }
        assert_eq!(
          Error::InvalidValue { kind: "example", value: "0".to_string() }
            .to_string()
        , "Unknown example: \"0\""
        );
    }

    #[test]
    fn flags_apply_on_top_of_example()
    {   let args = cli(&["--example", "2", "--tone", "Sad", "--temperature", "0.9"]);
        let config = load_config_from(&args, no_env).unwrap();
        let request = build_request(&args, &config).unwrap();
        assert_eq!(
          request.user_input()
        , "Compose a humorous limerick about a talking cat."
        );
        assert_eq!(request.prompt_style(), PromptStyle::FirstSentence);
        assert_eq!(request.style(), Style::Informal);
        assert_eq!(request.tone(), Tone::Sad);
        assert_eq!(request.temperature(), 0.9);
    }

    #[test]
    fn example_conflicts_with_input()
    {   assert!(
          Cli::try_parse_from(["storyprompt", "--example", "1", "x"]).is_err()
        );
        assert!(
          Cli::try_parse_from(["storyprompt", "--tone", "Angry", "x"]).is_err()
        );
    }

    #[test]
    fn errors_exit_with_one()
    {   assert_eq!(exit_code(&Ok(())), 0);
        assert_eq!(exit_code(&Err(Error::InvalidTemperature(3.0))), 1);
        assert_eq!(exit_code(&Err(Error::NoChoicesInResponse)), 1);
    }

    #[tokio::test]
    async fn dry_run_with_bad_example_fails()
    {   let result = run(cli(&["--example", "0", "--dry-run"])).await;
        assert_eq!(exit_code(&result), 1);
        let result = run(cli(&["--dry-run", "--style", "Poetic", "x"])).await;
        assert_eq!(exit_code(&result), 0);
    }
}
