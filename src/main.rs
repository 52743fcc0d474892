//! Terminal front-end: each argument (or stdin line) is one trigger.
//!
//! ```text
//! promptdeck joke fact
//! promptdeck --config deck.json
//! ```

use std::sync::Arc;
use log::{debug, error};
use tokio::io::{AsyncBufReadExt, BufReader};

use promptdeck::{
  ClientConfig, DisplayStyle, HttpTransport, PromptDeckBackend, PromptKind
};

#[tokio::main]
async fn main()
{   env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config = match load_config(&mut args)
    {   Ok(config) => config
      , Err(err) => {
          eprintln!("{}", err.user_message());
          std::process::exit(2);
        }
    };

    let backend = PromptDeckBackend::new(
      config,
      Arc::new(HttpTransport::new())
    );

    if args.is_empty()
    {   print_menu();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        // next line is only read once the current trigger is back to Idle
        while let Ok(Some(line)) = lines.next_line().await
        {   if line.trim().is_empty()
            {   continue;
            }
            run_trigger(&backend, &line).await;
        }
    } else
    {   for tag in &args
        {   run_trigger(&backend, tag).await;
        }
    }

    if let Err(err) = backend.shutdown().await
    {   error!("Shutdown failed: {}", err);
    }
}

/// `--config <path>` loads a JSON file; the key still falls back to env
fn load_config(
  args: &mut Vec<String>
) -> Result<ClientConfig, promptdeck::ApiError>
{   let Some(pos) = args.iter().position(|a| a == "--config")
    else
    {   return Ok(ClientConfig::from_env());
    };

    if pos + 1 >= args.len()
    {   return Err(promptdeck::ApiError::Config(
          "--config needs a path".to_string()
        ));
    }
    let path = args.remove(pos + 1);
    args.remove(pos);

    let mut config = ClientConfig::from_json_file(&path)?;
    if config.credential().is_none()
    {   config.api_key = ClientConfig::from_env().api_key;
    }
    Ok(config)
}

async fn run_trigger(backend: &PromptDeckBackend, tag: &str)
{   let mut states = match backend.trigger(tag).await
    {   Ok(rx) => rx
      , Err(err) => {
          error!("Trigger {:?} not queued: {}", tag, err);
          eprintln!("{}", err.user_message());
          return;
        }
    };

    let mut seen = false;
    while let Some(state) = states.recv().await
    {   seen = true;
        debug!("controls enabled: {}", state.controls_enabled());
        if let Some(rendered) = state.rendered()
        {   match rendered.style
            {   DisplayStyle::Normal => println!("{}", rendered.text)
              , DisplayStyle::Error => eprintln!("! {}", rendered.text)
            }
        }
    }

    if !seen
    {   print_menu();
    }
}

fn print_menu()
{   let tags: Vec<&str> = PromptKind::ALL
      .iter()
      .map(|k| k.tag())
      .collect();
    println!("Pick one: {}", tags.join(", "));
}
