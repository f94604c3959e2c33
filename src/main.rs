use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use orgchart::permission::{AccessPolicy, DepartmentScopedManagers, RoleScoped};
use orgchart::report::render_rows;
use orgchart::tree::flatten::collapse_below;
use orgchart::tree::{BuildIssue, DepartmentFilter};
use orgchart::{source, Config, OrgChartState, OrgTreeEngine};

fn print_help() {
    println!("Usage: orgchart [OPTIONS]");
    println!("Options:");
    println!("  -config <path>       Path to configuration file (default: ./etc/orgchart.toml)");
    println!("  -search <text>       Only rows whose name, job title or department contains <text>");
    println!("  -department <id|all> Only rows of one department (default: all)");
    println!("  -collapse <id>       Collapse a node (repeatable)");
    println!("  -scope-managers      Limit managers to their own department");
    println!("  -format <text|json>  Output format (default: text)");
    println!("  -help, --help        Print this help message");
}

/// Value following `flag`, if any
fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .skip_while(|arg| arg.as_str() != flag)
        .nth(1)
        .map(|s| s.as_str())
}

/// Every value following a repeatable `flag`
fn arg_values<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .map(|pair| pair[1].as_str())
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-help" || arg == "--help") {
        print_help();
        return Ok(());
    }

    let config_path = arg_value(&args, "-config").unwrap_or("./etc/orgchart.toml");

    // Load configuration first (before logging init)
    let config = Config::load(config_path).unwrap_or_else(|e| {
        eprintln!("Could not load config file: {}, using defaults", e);
        Config::default()
    });

    // Initialize logging
    // Priority: RUST_LOG env var > config file > default "info"
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Loading configuration from: {}", config_path);

    let department: DepartmentFilter = match arg_value(&args, "-department") {
        Some(value) => value.parse()?,
        None => DepartmentFilter::All,
    };

    let policy: Arc<dyn AccessPolicy> = if args.iter().any(|arg| arg == "-scope-managers") {
        Arc::new(DepartmentScopedManagers::new(RoleScoped))
    } else {
        Arc::new(RoleScoped)
    };

    let engine = OrgTreeEngine::new(config.tree.build_options());
    let mut state = OrgChartState::with_policy(engine, policy);

    let data_source = source::from_config(&config.source)?;
    if config.source.report {
        let department_id = match department {
            DepartmentFilter::Only(id) => Some(id),
            DepartmentFilter::All => None,
        };
        let (forest, departments) = tokio::try_join!(
            data_source.org_chart(department_id),
            data_source.departments()
        )?;
        info!(
            "Fetched org chart with {} employees and {} departments",
            forest.node_count(),
            departments.len()
        );
        state.set_departments(departments);
        state.load_forest(forest);
    } else {
        let (employees, departments) =
            tokio::try_join!(data_source.employees(), data_source.departments())?;
        info!(
            "Fetched {} employees and {} departments",
            employees.len(),
            departments.len()
        );
        state.set_departments(departments);
        state.load(&employees);
    }

    for issue in state.issues() {
        if let BuildIssue::CycleDetected { ids } = issue {
            tracing::warn!("Manager cycle among {:?}, shown as separate roots", ids);
        }
    }

    if let Some(depth) = config.tree.expand_depth {
        state.apply_expansion(|rows| collapse_below(rows, depth));
    }
    for id in arg_values(&args, "-collapse") {
        match id.parse::<i64>() {
            Ok(id) => {
                if !state.toggle(id) {
                    tracing::warn!("No employee with id {}", id);
                }
            }
            Err(_) => tracing::warn!("Ignoring invalid node id '{}'", id),
        }
    }

    if let Some(text) = arg_value(&args, "-search") {
        state.set_search(text);
    }
    if let DepartmentFilter::Only(id) = department {
        if !state.departments().iter().any(|d| d.id == id) {
            tracing::warn!("Department {} is not in the department list", id);
        }
    }
    state.set_department(department);
    state.set_viewer(Some(config.viewer.viewer()));

    let rows = state.visible();
    match arg_value(&args, "-format").unwrap_or("text") {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => print!("{}", render_rows(&rows)),
    }

    Ok(())
}
