use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{
    Cli, Command, DeleteArgs, GetArgs, ListArgs, SearchArgs, StatusArgs,
};
use quire::{Catalog, DataDir, Document, DocumentId, backup, error, ingestion};

fn init_tracing(verbose: u8) {
    let filter = if let Ok(env) = std::env::var("QUIRE_LOG") {
        EnvFilter::new(env)
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let catalog = Catalog::open(&data_dir.catalog_db())?;

    match cli.command {
        Command::Add(args) => {
            let id = ingestion::add_document(
                &catalog,
                &data_dir,
                &args.path,
                args.title,
                args.authors,
                args.keywords,
            )?;
            println!("{id}");
        }
        Command::Get(args) => {
            cmd_get(&catalog, &data_dir, &args)?;
        }
        Command::Search(args) => {
            cmd_search(&catalog, &args)?;
        }
        Command::Delete(args) => {
            cmd_delete(&catalog, &args)?;
        }
        Command::List(args) => {
            cmd_list(&catalog, &args)?;
        }
        Command::Save(args) => {
            let count = backup::save(&catalog, &args.path)?;
            println!("Saved {count} documents to {}", args.path.display());
        }
        Command::Load(args) => {
            let count = backup::load(&catalog, &args.path)?;
            println!("Loaded {count} documents from {}", args.path.display());
        }
        Command::Status(args) => {
            cmd_status(&catalog, &data_dir, &args)?;
        }
        Command::Completions(_) => unreachable!("handled above"),
    }

    Ok(())
}

fn document_json(id: DocumentId, document: &Document) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "title": document.title,
        "authors": document.authors,
        "keywords": document.keywords,
        "extension": document.extension,
        "hash": document.hash.to_hex(),
    })
}

fn print_document(id: DocumentId, document: &Document) {
    println!("{id}\t{}", document.title);
    if !document.authors.is_empty() {
        println!("\tauthors: {}", document.authors.join(", "));
    }
    if !document.keywords.is_empty() {
        println!("\tkeywords: {}", document.keywords.join(", "));
    }
    println!("\thash: {}", document.hash);
}

fn cmd_get(
    catalog: &Catalog,
    data_dir: &DataDir,
    args: &GetArgs,
) -> error::Result<()> {
    let id: DocumentId = args.id.parse()?;
    let document = catalog.get(id)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&document_json(id, &document))?
        );
    } else {
        print_document(id, &document);
        let path = ingestion::stored_path(data_dir, &document)?;
        println!("\tfile: {}", path.display());
    }
    Ok(())
}

fn cmd_search(catalog: &Catalog, args: &SearchArgs) -> error::Result<()> {
    let ids = catalog.search(&args.query);

    if args.ids {
        for id in &ids {
            println!("{id}");
        }
        return Ok(());
    }

    let mut hits = Vec::with_capacity(ids.len());
    for id in ids {
        hits.push((id, catalog.get(id)?));
    }

    if args.json {
        let values: Vec<_> = hits
            .iter()
            .map(|(id, document)| document_json(*id, document))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if hits.is_empty() {
        println!("No results for \"{}\"", args.query);
    } else {
        for (id, document) in &hits {
            print_document(*id, document);
        }
    }
    Ok(())
}

fn cmd_delete(catalog: &Catalog, args: &DeleteArgs) -> error::Result<()> {
    let id: DocumentId = args.id.parse()?;
    if catalog.delete(id)? {
        println!("Deleted document {id}");
    } else {
        println!("No document with id {id}");
    }
    Ok(())
}

fn cmd_list(catalog: &Catalog, args: &ListArgs) -> error::Result<()> {
    if args.json {
        let mut values = Vec::new();
        catalog.for_each(|id, document| {
            values.push(document_json(id, &document));
            Ok(())
        })?;
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        catalog.for_each(|id, document| {
            println!("{id}\t{}", document.title);
            Ok(())
        })?;
    }
    Ok(())
}

fn cmd_status(
    catalog: &Catalog,
    data_dir: &DataDir,
    args: &StatusArgs,
) -> error::Result<()> {
    let count = catalog.len()?;

    if args.json {
        let value = serde_json::json!({
            "data_dir": data_dir.root().display().to_string(),
            "documents": count,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Data directory: {}", data_dir.root().display());
        println!("Documents: {count}");
    }
    Ok(())
}
