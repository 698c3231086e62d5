use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug};
use wifi_qr::render::{from_luma_image, to_luma_image, to_svg, to_text};
use wifi_qr::{
    Credentials, ECLevel, EncodeOptions, MaskPattern, SecurityType, encode_credentials_with,
    payload, read_matrix, read_symbol,
};

#[derive(Parser)]
#[command(name = "wifiqr", version, about = "Wi-Fi join QR code generator")]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the WIFI: payload for a network
    Payload {
        #[command(flatten)]
        network: NetworkArgs,
    },
    /// Encode a network as PNG, SVG or terminal text
    Generate {
        #[command(flatten)]
        network: NetworkArgs,
        #[command(flatten)]
        encode: EncodeArgs,
        /// Output file (.png or .svg); prints text when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pixels per module for raster and SVG output
        #[arg(long, default_value_t = 8)]
        scale: u32,
    },
    /// Encode a network, read the symbol back and compare
    Verify {
        #[command(flatten)]
        network: NetworkArgs,
        #[command(flatten)]
        encode: EncodeArgs,
        /// Read this PNG (written by `generate`) instead of a fresh encoding
        #[arg(long)]
        image: Option<PathBuf>,
        /// Pixels per module of `--image`
        #[arg(long, default_value_t = 8)]
        scale: u32,
    },
}

#[derive(Args)]
struct NetworkArgs {
    #[arg(long)]
    ssid: String,
    #[arg(long)]
    password: Option<String>,
    /// wpa, wep or open (default: wpa with a password, open without)
    #[arg(long)]
    security: Option<SecurityType>,
    #[arg(long)]
    hidden: bool,
}

impl NetworkArgs {
    fn credentials(&self) -> Credentials {
        let security = self.security.unwrap_or(if self.password.is_some() {
            SecurityType::Wpa
        } else {
            SecurityType::Open
        });
        Credentials {
            ssid: self.ssid.clone(),
            password: self.password.clone().filter(|p| !p.is_empty()),
            security,
            hidden: self.hidden,
        }
    }
}

#[derive(Args)]
struct EncodeArgs {
    /// Error correction level (L, M, Q, H)
    #[arg(long)]
    ec: Option<ECLevel>,
    /// Use the highest EC level that fits the chosen version
    #[arg(long)]
    boost_ec: bool,
    /// Force a mask pattern (0-7)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..8))]
    mask: Option<u8>,
    /// Quiet zone width in modules
    #[arg(long)]
    quiet_zone: Option<usize>,
}

impl EncodeArgs {
    fn options(&self) -> EncodeOptions {
        let mut options = EncodeOptions::default().boost_ec(self.boost_ec);
        if let Some(ec) = self.ec {
            options = options.ec_level(ec);
        }
        if let Some(mask) = self.mask {
            options = options.mask(MaskPattern::from_bits(mask));
        }
        if let Some(quiet_zone) = self.quiet_zone {
            options = options.quiet_zone(quiet_zone);
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Payload { network } => payload_cmd(&network),
        Command::Generate {
            network,
            encode,
            out,
            scale,
        } => generate_cmd(&network, &encode, out.as_deref(), scale),
        Command::Verify {
            network,
            encode,
            image,
            scale,
        } => verify_cmd(&network, &encode, image.as_deref(), scale),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn payload_cmd(network: &NetworkArgs) -> Result<(), Box<dyn Error>> {
    let payload = payload::format(&network.credentials())?;
    println!("{payload}");
    Ok(())
}

fn generate_cmd(
    network: &NetworkArgs,
    encode: &EncodeArgs,
    out: Option<&Path>,
    scale: u32,
) -> Result<(), Box<dyn Error>> {
    let qr = encode_credentials_with(&network.credentials(), &encode.options())?;
    let matrix = &qr.matrix;
    debug!(payload = %qr.payload, "encoded");

    match out {
        None => print!("{}", to_text(matrix)),
        Some(path) if has_extension(path, "svg") => std::fs::write(path, to_svg(matrix, scale))?,
        Some(path) => to_luma_image(matrix, scale).save(path)?,
    }

    eprintln!(
        "version={} ec={} mask={} size={} modules",
        matrix.version(),
        matrix.ec_level(),
        matrix.mask().index(),
        matrix.size()
    );
    if let Some(path) = out {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn verify_cmd(
    network: &NetworkArgs,
    encode: &EncodeArgs,
    image_path: Option<&Path>,
    scale: u32,
) -> Result<(), Box<dyn Error>> {
    let credentials = network.credentials();
    let options = encode.options();
    let qr = encode_credentials_with(&credentials, &options)?;

    let result = match image_path {
        None => read_matrix(&qr.matrix)?,
        Some(path) => {
            let raster = image::open(path)?.to_luma8();
            let modules = from_luma_image(&raster, scale).ok_or_else(|| {
                format!("{} is not a square grid of {scale}px modules", path.display())
            })?;
            let border = options.quiet_zone;
            let side = modules
                .width()
                .checked_sub(2 * border)
                .ok_or("quiet zone wider than image")?;
            read_symbol(&modules.crop(border, border, side, side))?
        }
    };

    println!(
        "read version={} ec={} mask={} corrected={}",
        result.version,
        result.ec_level,
        result.mask.index(),
        result.corrected
    );

    if result.data != qr.payload.as_bytes() {
        return Err(format!(
            "payload mismatch: expected {:?}, read {:?}",
            qr.payload.as_str(),
            String::from_utf8_lossy(&result.data)
        )
        .into());
    }
    let text = result.text().ok_or("payload is not UTF-8")?;
    let parsed = payload::unformat(text)?;
    if parsed != credentials {
        return Err(format!("credentials mismatch: {parsed:?}").into());
    }
    println!("ok: {text}");
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
