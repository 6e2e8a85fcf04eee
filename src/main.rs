use std::{env, fs, io, path::Path};

use rplcore::{
    runtime::{
        Runtime, RuntimeConfig, RuntimeError,
        screen::{Comparison, ReferenceImages},
    },
    syntax::render_expr,
};

struct Options {
    trace: bool,
    no_gc: bool,
    config: RuntimeConfig,
}

fn main() {
    env_logger::init();

    let mut args: Vec<String> = env::args().collect();
    let trace = args.iter().any(|arg| arg == "--trace");
    let no_gc = args.iter().any(|arg| arg == "--no-gc");
    let unit_mode = args.iter().any(|arg| arg == "--unit-mode");
    if trace {
        args.retain(|arg| arg != "--trace");
    }
    if no_gc {
        args.retain(|arg| arg != "--no-gc");
    }
    if unit_mode {
        args.retain(|arg| arg != "--unit-mode");
    }

    let config_path = match extract_flag(&mut args, "--config") {
        Some(value) => value,
        None => return,
    };
    let mut config = match config_path {
        Some(path) => match RuntimeConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err.render());
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };
    match extract_number(&mut args, "--heap-bytes") {
        Some(Some(bytes)) => config.heap_bytes = bytes,
        Some(None) => {}
        None => return,
    }
    match extract_number(&mut args, "--precision") {
        Some(Some(digits)) => config.precision = digits,
        Some(None) => {}
        None => return,
    }
    match extract_flag(&mut args, "--units") {
        Some(Some(path)) => config.units_file = Some(path),
        Some(None) => {}
        None => return,
    }
    if unit_mode {
        config.unit_mode = true;
    }
    let options = Options {
        trace,
        no_gc,
        config,
    };

    if args.len() < 2 {
        print_help();
        return;
    }

    if is_rpl_file(&args[1]) {
        run_file(&args[1], &options);
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => print_help(),
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: rplcore run <file.rpl>");
                return;
            }
            run_file(&args[2], &options);
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: rplcore eval \"<command line>\"");
                return;
            }
            eval_line(&args[2..].join(" "), &options);
        }
        "screen" => {
            if args.len() < 3 {
                eprintln!("Usage: rplcore screen \"<command line>\" [--refs <file.json> --name <name> [--record]] [--pbm <file.pbm>]");
                return;
            }
            show_screen(&mut args, &options);
        }
        "units" => list_units(&options, args.get(2).map(String::as_str)),
        "config" => match options.config.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("{}", err.render()),
        },
        "repl" => repl(&options),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
        }
    }
}

fn print_help() {
    println!(
        "\
RPL core

Usage:
  rplcore <file.rpl>
  rplcore run <file.rpl>
  rplcore eval \"<command line>\"
  rplcore screen \"<command line>\" [--refs <file.json> --name <name> [--record]] [--pbm <file.pbm>]
  rplcore units [category]
  rplcore config
  rplcore repl

Flags:
  --trace              Print every command and the resulting stack
  --no-gc              Disable collection; allocation fails once the heap is full
  --unit-mode          Evaluate unit names inside algebraics as units
  --heap-bytes <n>     Heap size in bytes
  --precision <n>      Decimal working precision in digits
  --config <path>      Load settings from a JSON file
  --units <path>       Load a unit definition CSV in front of the built-in table
  -h, --help           Show this help message
"
    );
}

fn is_rpl_file(path: &str) -> bool {
    path.ends_with(".rpl")
}

/// Removes `flag <value>` from `args`. Returns `None` after printing a usage
/// error.
fn extract_flag(args: &mut Vec<String>, flag: &str) -> Option<Option<String>> {
    let mut value = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 >= args.len() {
                eprintln!("Usage: rplcore {} <value>", flag);
                return None;
            }
            value = Some(args.remove(i + 1));
            args.remove(i);
            continue;
        }
        i += 1;
    }
    Some(value)
}

fn extract_number(args: &mut Vec<String>, flag: &str) -> Option<Option<usize>> {
    match extract_flag(args, flag)? {
        Some(text) => match text.parse::<usize>() {
            Ok(parsed) => Some(Some(parsed)),
            Err(_) => {
                eprintln!("Error: {} expects a non-negative integer.", flag);
                None
            }
        },
        None => Some(None),
    }
}

fn new_runtime(options: &Options) -> Runtime {
    match Runtime::new(options.config.clone()) {
        Ok(mut runtime) => {
            runtime.set_trace(options.trace);
            if options.no_gc {
                runtime.set_gc_enabled(false);
            }
            runtime
        }
        Err(err) => {
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
    }
}

fn print_stack(runtime: &Runtime) {
    let values = runtime.stack_values();
    let depth = values.len();
    for (i, value) in values.iter().enumerate() {
        println!("{}: {}", depth - i, value);
    }
}

fn fail(err: &RuntimeError, runtime: &Runtime) -> ! {
    eprintln!("{}", err.render());
    print_stack(runtime);
    std::process::exit(1);
}

/// Runs a file line by line. `@` starts a comment that runs to the end of
/// the line.
fn run_file(path: &str, options: &Options) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading {}: {}", path, err);
            std::process::exit(1);
        }
    };
    let mut runtime = new_runtime(options);
    for line in source.lines() {
        let code = line.split('@').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }
        if let Err(err) = runtime.execute(code) {
            fail(&err, &runtime);
        }
    }
    print_stack(&runtime);
}

fn eval_line(line: &str, options: &Options) {
    let mut runtime = new_runtime(options);
    if let Err(err) = runtime.execute(line) {
        fail(&err, &runtime);
    }
    print_stack(&runtime);
}

fn show_screen(args: &mut Vec<String>, options: &Options) {
    let record = args.iter().any(|arg| arg == "--record");
    args.retain(|arg| arg != "--record");
    let (Some(refs_path), Some(name), Some(pbm_path)) = (
        extract_flag(args, "--refs"),
        extract_flag(args, "--name"),
        extract_flag(args, "--pbm"),
    ) else {
        return;
    };

    let mut runtime = new_runtime(options);
    if let Err(err) = runtime.execute(&args[2..].join(" ")) {
        eprintln!("{}", err.render());
    }
    let screen = runtime.render_screen().clone();
    println!("digest: {}", screen.digest());

    if let Some(path) = pbm_path {
        if let Err(err) = fs::write(&path, screen.to_pbm()) {
            eprintln!("Error writing {}: {}", path, err);
            std::process::exit(1);
        }
        println!("wrote {}", path);
    }

    let (Some(refs_path), Some(name)) = (refs_path, name) else {
        return;
    };
    let mut refs = match ReferenceImages::load(Path::new(&refs_path)) {
        Ok(refs) => refs,
        Err(err) => {
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
    };
    if record {
        refs.record(&name, &screen);
        if let Err(err) = refs.save() {
            eprintln!("{}", err.render());
            std::process::exit(1);
        }
        println!("recorded {}", name);
        return;
    }
    match refs.check(&name, &screen) {
        Comparison::Match => println!("{}: match", name),
        Comparison::Mismatch { expected, actual } => {
            println!("{}: mismatch\n  expected {}\n  actual   {}", name, expected, actual);
            std::process::exit(1);
        }
        Comparison::Missing { actual } => {
            println!("{}: no reference (actual {})", name, actual);
            std::process::exit(1);
        }
    }
}

fn list_units(options: &Options, category: Option<&str>) {
    let runtime = new_runtime(options);
    let units = runtime.units();
    let defs: Vec<_> = match category {
        Some(category) => units.category(category),
        None => units.iter().collect(),
    };
    let mut current = "";
    for def in defs {
        if def.category != current {
            current = def.category.as_str();
            println!("{}", current);
        }
        if def.is_base() {
            println!("  {:<10} base", def.name);
        } else {
            println!("  {:<10} {} {}", def.name, def.factor, render_expr(&def.base));
        }
    }
}

fn repl(options: &Options) {
    use io::Write;

    println!(
        "RPL core v{} (type :help for help, :quit to exit)",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = io::stdin();
    let mut runtime = new_runtime(options);
    let mut line = String::new();

    loop {
        print!("rpl> ");
        let _ = io::stdout().flush();

        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                print_repl_help();
                continue;
            }
            ":gc" => {
                let stats = runtime.collect();
                println!(
                    "collected: {} live, {} reclaimed, {} -> {} bytes",
                    stats.live_objects, stats.reclaimed_objects, stats.bytes_before, stats.bytes_after
                );
                continue;
            }
            ":screen" => {
                println!("digest: {}", runtime.render_screen().digest());
                continue;
            }
            _ => {}
        }

        if let Some(codes) = trimmed.strip_prefix(":keys") {
            press_keys(&mut runtime, codes);
        } else if let Err(err) = runtime.execute(trimmed) {
            eprintln!("{}", err.render());
        }
        print_stack(&runtime);
    }

    println!("Goodbye!");
}

/// Feeds whitespace-separated key codes, each followed by a release.
fn press_keys(runtime: &mut Runtime, codes: &str) {
    for word in codes.split_whitespace() {
        let Ok(code) = word.parse::<u8>() else {
            eprintln!("Error: key codes are integers, got `{}`", word);
            return;
        };
        if let Err(err) = runtime.push_key(code).and_then(|_| runtime.push_key(0)) {
            eprintln!("{}", err.render());
        }
    }
    if let Some(editor) = runtime.key_state().editor() {
        println!("editing: {}", editor);
    }
}

fn print_repl_help() {
    println!(
        "\
Commands:
  :quit, :q        Exit the REPL
  :help, :h        Show this help message
  :gc              Run a full collection and print its statistics
  :screen          Redraw the screen and print its digest
  :keys <codes>    Press keys by DM42 key code (e.g. :keys 29 13 30 37)

Anything else is an RPL command line. The stack is printed after each line."
    );
}
