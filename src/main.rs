use clangd_idx_reader::{IdxReader, IndexData, RelationKind, SymbolKind, SymbolLanguage};
use std::collections::BTreeMap;
use std::env;

const DEFAULT_LIMIT: usize = 20;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1].starts_with("--") {
        eprintln!("Usage: {} <path-to-idx-file> [--verbose] [--limit N]", args[0]);
        std::process::exit(1);
    }

    let idx_path = &args[1];
    let verbose = args.iter().any(|arg| arg == "--verbose");
    let mut limit = DEFAULT_LIMIT;
    // Parse --limit argument
    if let Some(limit_idx) = args.iter().position(|arg| arg == "--limit") {
        match args.get(limit_idx + 1).map(|value| value.parse::<usize>()) {
            Some(Ok(value)) => limit = value,
            Some(Err(_)) => {
                eprintln!("ERROR: --limit expects a non-negative number.");
                std::process::exit(1);
            }
            None => {
                eprintln!("ERROR: --limit flag requires an argument.");
                std::process::exit(1);
            }
        }
    }

    println!("Reading clangd index shard: {}", idx_path);
    println!("{}", "=".repeat(60));

    let reader = match IdxReader::open(idx_path) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("\nERROR: Failed to open index shard");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    let data = match reader.read_all() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("\nERROR: Failed to decode index shard");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let info = reader.file_info();
    println!("\nFile Information:");
    if let Some(name) = &info.file_name {
        println!("  File: {}", name);
    }
    if let Some(shard) = &info.shard {
        println!("  Source basename: {}", shard.basename);
        println!("  Path hash: {}", shard.hash);
    }
    println!("  Format version: {} ({})", info.format_version, reader.strategy());
    println!("  Chunks:");
    for (id, size) in &info.chunks {
        println!("    {}: {} bytes", id, size);
    }

    let strings = reader.string_table();
    println!("\nString Table:");
    println!("  Strings: {}", strings.len());
    println!("  Total size: {} bytes", strings.total_bytes());

    print_symbols(&data, verbose, limit);
    print_refs(&data);
    print_relations(&data);
    print_include_graph(&data);

    println!("\nCompile Command:");
    match &data.command {
        Some(command) => {
            println!("  Directory: {}", command.directory);
            println!("  Arguments: {}", command.arguments.join(" "));
        }
        None => println!("  (none)"),
    }
}

fn print_symbols(data: &IndexData, verbose: bool, limit: usize) {
    let mut kinds: BTreeMap<u8, (SymbolKind, usize)> = BTreeMap::new();
    let mut languages: BTreeMap<u8, (SymbolLanguage, usize)> = BTreeMap::new();
    for symbol in &data.symbols {
        kinds.entry(symbol.kind.as_u8()).or_insert((symbol.kind, 0)).1 += 1;
        languages
            .entry(symbol.language.as_u8())
            .or_insert((symbol.language, 0))
            .1 += 1;
    }

    println!("\nSymbols: {}", data.symbols.len());
    let mut by_count: Vec<_> = kinds.values().collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1));
    for (kind, count) in by_count.into_iter().take(10) {
        println!("  {:<20} {}", kind.to_string(), count);
    }
    for (language, count) in languages.values() {
        println!("  Language {:<11} {}", language.to_string(), count);
    }
    let with_definition = data.symbols.iter().filter(|s| s.definition.is_some()).count();
    let with_docs = data.symbols.iter().filter(|s| !s.documentation.is_empty()).count();
    println!("  With definition: {}", with_definition);
    println!("  With documentation: {}", with_docs);

    if verbose {
        println!("\nSample Symbols (first {}):", limit);
        for (i, symbol) in data.symbols.iter().take(limit).enumerate() {
            println!(
                "  {}. [{}] {} {}{}{}",
                i + 1,
                symbol.id,
                symbol.kind,
                symbol.scope,
                symbol.name,
                symbol.signature
            );
            if let Some(location) = &symbol.canonical_declaration {
                println!("      declared at {}", location);
            }
            if let Some(location) = &symbol.definition {
                println!("      defined at {}", location);
            }
            let flags = symbol.flags.names();
            if !flags.is_empty() {
                println!("      flags: {}", flags.join(", "));
            }
            for header in &symbol.include_headers {
                println!(
                    "      include {} ({} refs, {})",
                    header.header, header.references, header.directive
                );
            }
        }
        if data.symbols.len() > limit {
            println!("  ... and {} more", data.symbols.len() - limit);
        }
    }
}

fn print_refs(data: &IndexData) {
    println!("\nReferences:");
    println!("  Symbols referenced: {}", data.refs.len());
    println!("  Total references: {}", data.refs.total_refs());
}

fn print_relations(data: &IndexData) {
    let base_of = data
        .relations
        .iter()
        .filter(|r| r.predicate == RelationKind::BaseOf)
        .count();
    let overridden_by = data
        .relations
        .iter()
        .filter(|r| r.predicate == RelationKind::OverriddenBy)
        .count();

    println!("\nRelations: {}", data.relations.len());
    println!("  BaseOf: {}", base_of);
    println!("  OverriddenBy: {}", overridden_by);
    let other = data.relations.len() - base_of - overridden_by;
    if other > 0 {
        println!("  Other: {}", other);
    }
}

fn print_include_graph(data: &IndexData) {
    let errors = data.include_graph.iter().filter(|n| n.had_errors()).count();
    let edges: usize = data
        .include_graph
        .iter()
        .map(|n| n.direct_includes.len())
        .sum();

    println!("\nInclude Graph: {} files", data.include_graph.len());
    for unit in data.translation_units() {
        println!("  Translation unit: {}", unit.uri);
    }
    println!("  Files with errors: {}", errors);
    println!("  Include edges: {}", edges);
}
