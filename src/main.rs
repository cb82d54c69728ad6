use bpg_rs::{
    Browser, Codec, CodecDecoder, Codecs, Direction, FsLister, Navigation, OptionValue,
    build_encode_parameters, decode_grid, encode_grid, parse_option,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Step {
    Next,
    Prev,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an image and write it in another format
    Decode {
        /// Input image file (.bpg, or any format the image crate reads)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (format chosen by extension)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Encode an image, typically to BPG
    Encode {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (format chosen by extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Encode option as key=value (qp, lossless, compress_level,
        /// preferred_chroma_format, color_space). Invalid values keep the default.
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Display information about an image file
    Info {
        /// Image file to inspect
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Browse the directory of a file, skipping unreadable entries
    Browse {
        /// File to start from
        #[arg(short, long)]
        input: PathBuf,

        /// Navigation steps to apply after opening
        #[arg(short, long, value_enum)]
        steps: Vec<Step>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { input, output } => decode_command(input, output)?,
        Commands::Encode {
            input,
            output,
            params,
        } => encode_command(input, output, &params)?,
        Commands::Info { input } => info_command(input)?,
        Commands::Browse { input, steps } => browse_command(input, &steps)?,
    }

    Ok(())
}

fn decode_command(input: PathBuf, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let codecs = Codecs::standard();
    let grid = decode_grid(&codecs, &input)?;

    println!(
        "Decoded image: {}x{}, {} channel(s)",
        grid.width(),
        grid.height(),
        grid.channel_count()
    );

    encode_grid(&codecs, &grid, &output, &HashMap::new())?;
    println!("Image saved to: {}", output.display());
    Ok(())
}

fn encode_command(
    input: PathBuf,
    output: PathBuf,
    params: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options: HashMap<String, OptionValue> = HashMap::new();
    for param in params {
        match parse_option(param) {
            Some((key, value)) => {
                options.insert(key, value);
            }
            None => println!("Ignoring malformed option: {}", param),
        }
    }

    let codecs = Codecs::standard();
    let grid = decode_grid(&codecs, &input)?;
    let resolved = build_encode_parameters(&options);

    encode_grid(&codecs, &grid, &output, &options)?;

    println!(
        "Image encoded: {} (qp {}, lossless {}, level {}, chroma {:?}, color space {:?})",
        output.display(),
        resolved.quantizer,
        resolved.lossless,
        resolved.compression_level,
        resolved.chroma_format,
        resolved.color_space
    );
    if let Ok(meta) = std::fs::metadata(&output) {
        println!("File Size: {}", format_bytes(meta.len() as usize));
    }
    Ok(())
}

fn info_command(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let codecs = Codecs::standard();
    let codec = codecs.reader_for(&input)?;
    let record = codec.decode(&input)?;

    println!("File: {}", input.display());
    println!("Codec: {}", codec.name());
    println!("Dimensions: {}x{}", record.width(), record.height());
    println!("Channel Layout: {:?}", record.layout());
    println!("Has Alpha: {}", record.has_alpha());
    println!("Grayscale: {}", record.is_grayscale());
    println!("Samples: {}", record.samples().len());
    if let Ok(meta) = std::fs::metadata(&input) {
        println!("File Size: {}", format_bytes(meta.len() as usize));
    }
    Ok(())
}

fn browse_command(input: PathBuf, steps: &[Step]) -> Result<(), Box<dyn std::error::Error>> {
    let mut browser = Browser::new(FsLister, CodecDecoder(Codecs::standard()));

    let navigation = browser.open(&input)?;
    print_navigation(&navigation, &browser.status_text());

    for step in steps {
        let direction = match step {
            Step::Next => Direction::Forward,
            Step::Prev => Direction::Backward,
        };
        let navigation = browser.step(direction)?;
        print_navigation(&navigation, &browser.status_text());
    }
    Ok(())
}

fn print_navigation(navigation: &Navigation, status: &str) {
    match navigation {
        Navigation::Shown { grid, .. } => println!(
            "{} ({}x{}, {} channel(s))",
            status,
            grid.width(),
            grid.height(),
            grid.channel_count()
        ),
        Navigation::NoReadableFile { .. } => println!("{}", status),
    }
}

// Helper function to format byte sizes in a human-readable way
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
