//! Command-line interface for the Twinlink placeholder engine.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use twinlink_core::config::PlaceholderConfig;
use twinlink_core::logging::{self, LogFormat};
use twinlink_core::{Error, ErrorResponse, Headers, TopicPath};
use twinlink_placeholders::placeholders::{
    self, AnyPlaceholder, CONNECTION_PLACEHOLDER, ENTITY_PLACEHOLDER, FEATURE_PLACEHOLDER,
    HEADERS_PLACEHOLDER, POLICY_PLACEHOLDER, SOURCE_ADDRESS_PLACEHOLDER, THING_PLACEHOLDER,
    TOPIC_PLACEHOLDER,
};
use twinlink_placeholders::{
    functions, EnforcementConfig, EnforcementFilterFactory, ExpressionResolver, Placeholder,
    PlaceholderFilter,
};

/// Twinlink - resolve and validate placeholder templates.
#[derive(Parser, Debug)]
#[command(name = "twinlink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Maximum number of chained functions per expression (at least 1).
    #[arg(
        long,
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_chained_functions: Option<usize>,

    /// Print errors as JSON error responses.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Check a template without data.
    Validate {
        /// The template to validate.
        template: String,
        /// Usage context whose placeholders the template may use.
        #[arg(short, long, value_enum, default_value_t = Context::Connectivity)]
        context: Context,
        /// Explicit placeholders, in pass order; overrides the context.
        #[arg(short, long, value_enum, value_delimiter = ',')]
        placeholders: Vec<PlaceholderKind>,
        /// Print the template with every reference replaced by this value.
        #[arg(short, long)]
        replace: Option<String>,
    },
    /// Resolve a template against the given sources.
    Resolve {
        /// The template to resolve.
        template: String,
        #[command(flatten)]
        sources: Sources,
        /// Keep unresolved placeholders instead of failing.
        #[arg(long)]
        allow_unresolved: bool,
    },
    /// Check that the identity claimed by a message matches the addressed thing.
    Enforce {
        /// Template resolved against the message.
        #[arg(short, long)]
        input: String,
        /// Templates resolved against the addressed thing; one must match.
        #[arg(short, long = "filter", required = true)]
        filters: Vec<String>,
        /// Id of the addressed thing.
        #[arg(long)]
        thing_id: String,
        /// Source of the input template.
        #[arg(long, value_enum, default_value_t = InputKind::Header)]
        input_from: InputKind,
        /// Message header, as `key=value`.
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
        /// Topic path the message was sent on.
        #[arg(long)]
        topic: Option<String>,
    },
    /// List the pipeline functions.
    Functions,
}

/// Placeholder sources for `resolve`.
#[derive(clap::Args, Debug)]
struct Sources {
    #[arg(long)]
    thing_id: Option<String>,
    #[arg(long)]
    entity_id: Option<String>,
    #[arg(long)]
    feature_id: Option<String>,
    #[arg(long)]
    connection_id: Option<String>,
    #[arg(long)]
    policy_id: Option<String>,
    /// Message header, as `key=value`.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
    /// Topic path of the message.
    #[arg(long)]
    topic: Option<String>,
    /// Address the message was received on.
    #[arg(long)]
    source_address: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Context {
    Connectivity,
    Policy,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PlaceholderKind {
    Thing,
    Entity,
    Feature,
    Connection,
    Policy,
    Header,
    Topic,
    Source,
}

impl PlaceholderKind {
    fn placeholder(self) -> &'static dyn AnyPlaceholder {
        match self {
            PlaceholderKind::Thing => &THING_PLACEHOLDER,
            PlaceholderKind::Entity => &ENTITY_PLACEHOLDER,
            PlaceholderKind::Feature => &FEATURE_PLACEHOLDER,
            PlaceholderKind::Connection => &CONNECTION_PLACEHOLDER,
            PlaceholderKind::Policy => &POLICY_PLACEHOLDER,
            PlaceholderKind::Header => &HEADERS_PLACEHOLDER,
            PlaceholderKind::Topic => &TOPIC_PLACEHOLDER,
            PlaceholderKind::Source => &SOURCE_ADDRESS_PLACEHOLDER,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InputKind {
    Header,
    Topic,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid header '{}', expected key=value", raw))
}

fn parse_topic(topic: Option<&str>) -> std::result::Result<Option<TopicPath>, Error> {
    topic.map(TopicPath::parse).transpose()
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, LogFormat::from_env());

    let mut config = PlaceholderConfig::from_env();
    if let Some(max) = args.max_chained_functions {
        config = config.with_max_chained_functions(max);
    }
    tracing::debug!(?config, "placeholder configuration");

    match run(args.command, &config) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) if args.json => {
            let response = ErrorResponse::from(&err);
            println!("{}", serde_json::to_string_pretty(&response)?);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn run(command: Command, config: &PlaceholderConfig) -> std::result::Result<String, Error> {
    match command {
        Command::Validate {
            template,
            context,
            placeholders,
            replace,
        } => validate(&template, context, &placeholders, replace.as_deref(), config),
        Command::Resolve {
            template,
            sources,
            allow_unresolved,
        } => resolve(&template, &sources, allow_unresolved, config),
        Command::Enforce {
            input,
            filters,
            thing_id,
            input_from,
            headers,
            topic,
        } => {
            let enforcement = EnforcementConfig::new(input, filters);
            let headers: Headers = headers.into_iter().collect();
            enforce(
                enforcement,
                &thing_id,
                input_from,
                &headers,
                topic.as_deref(),
                config,
            )
        }
        Command::Functions => Ok(functions::catalog()
            .map(|function| function.signature().describe())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn validate(
    template: &str,
    context: Context,
    kinds: &[PlaceholderKind],
    replacement: Option<&str>,
    config: &PlaceholderConfig,
) -> std::result::Result<String, Error> {
    let explicit: Vec<&dyn AnyPlaceholder> = kinds.iter().map(|kind| kind.placeholder()).collect();
    let chain: &[&dyn AnyPlaceholder] = if !explicit.is_empty() {
        &explicit
    } else {
        match context {
            Context::Connectivity => placeholders::CONNECTIVITY_PLACEHOLDERS,
            Context::Policy => placeholders::POLICY_PLACEHOLDERS,
        }
    };

    match replacement {
        Some(replacement) => Ok(PlaceholderFilter::validate_and_replace_with_config(
            template,
            replacement,
            chain,
            config,
        )?),
        None => {
            PlaceholderFilter::validate_with_config(template, chain, config)?;
            Ok("valid".to_string())
        }
    }
}

fn resolve(
    template: &str,
    sources: &Sources,
    allow_unresolved: bool,
    config: &PlaceholderConfig,
) -> std::result::Result<String, Error> {
    let headers: Headers = sources.headers.iter().cloned().collect();
    let topic = parse_topic(sources.topic.as_deref())?;

    let mut resolver = ExpressionResolver::new()
        .with_config(config)
        .with_placeholder(&HEADERS_PLACEHOLDER, &headers);
    let ids: [(&dyn Placeholder<Source = str>, &Option<String>); 6] = [
        (&THING_PLACEHOLDER, &sources.thing_id),
        (&ENTITY_PLACEHOLDER, &sources.entity_id),
        (&FEATURE_PLACEHOLDER, &sources.feature_id),
        (&CONNECTION_PLACEHOLDER, &sources.connection_id),
        (&POLICY_PLACEHOLDER, &sources.policy_id),
        (&SOURCE_ADDRESS_PLACEHOLDER, &sources.source_address),
    ];
    for (placeholder, source) in ids {
        if let Some(source) = source {
            resolver = resolver.with_placeholder(placeholder, source.as_str());
        }
    }
    if let Some(topic) = &topic {
        resolver = resolver.with_placeholder(&TOPIC_PLACEHOLDER, topic);
    }

    Ok(PlaceholderFilter::apply(template, &resolver, allow_unresolved)?)
}

fn enforce(
    enforcement: EnforcementConfig,
    thing_id: &str,
    input_from: InputKind,
    headers: &Headers,
    topic: Option<&str>,
    config: &PlaceholderConfig,
) -> std::result::Result<String, Error> {
    let resolved_input = match input_from {
        InputKind::Header => {
            let factory = EnforcementFilterFactory::for_things(enforcement, &HEADERS_PLACEHOLDER)
                .with_placeholder_config(config);
            factory.validate()?;
            let filter = factory.get_filter(headers)?;
            filter.matches(thing_id, headers)?;
            filter.resolved_input().to_string()
        }
        InputKind::Topic => {
            let topic = parse_topic(topic)?.ok_or_else(|| {
                Error::InvalidConfiguration("--topic is required with --input-from topic".to_string())
            })?;
            let factory = EnforcementFilterFactory::for_things(enforcement, &TOPIC_PLACEHOLDER)
                .with_placeholder_config(config);
            factory.validate()?;
            let filter = factory.get_filter(&topic)?;
            filter.matches(thing_id, headers)?;
            filter.resolved_input().to_string()
        }
    };
    tracing::debug!(input = %resolved_input, thing_id, "enforcement passed");
    Ok(format!("match: {}", resolved_input))
}
