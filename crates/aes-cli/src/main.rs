//! Command-line interface for the configurable-S-box AES engine.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aes_core::{Block, CipherConfig, Construction, Context, Key, SboxTable};
use aes_target::{Assessment, Attack, Campaign, TargetConfig, TargetMode};
use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sbox_gen::{
    render_pair, Generator, GeneratorConfig, SboxCatalog, SboxEntry, SboxMetrics, Strategy,
};

const DEFAULT_IV_HEX: &str = "000102030405060708090a0b0c0d0e0f";
const DEFAULT_ATTACK_KEY_HEX: &str = "2b7e151628aed2a6abf7158809cf4f3c";

/// AES with configurable S-boxes for side-channel experiments.
#[derive(Parser)]
#[command(
    name = "sboxaes",
    version,
    author,
    about = "AES-128/192/256 with configurable S-boxes (ECB, CBC, CTR)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Ecb,
    Cbc,
    Ctr,
}

impl ModeArg {
    fn target_mode(self) -> TargetMode {
        match self {
            ModeArg::Ecb => TargetMode::Ecb,
            ModeArg::Cbc => TargetMode::Cbc,
            ModeArg::Ctr => TargetMode::Ctr,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SboxArg {
    /// Published AES S-box.
    Standard,
    /// Experimental permutation (does not reproduce AES vectors).
    Experimental,
    /// Alternate permutation.
    Alternate,
}

impl SboxArg {
    fn table(self) -> SboxTable {
        match self {
            SboxArg::Standard => SboxTable::STANDARD,
            SboxArg::Experimental => SboxTable::EXPERIMENTAL,
            SboxArg::Alternate => SboxTable::ALTERNATE,
        }
    }

    /// Name of the table in [`SboxCatalog::builtin`].
    fn catalog_name(self) -> &'static str {
        match self {
            SboxArg::Standard => "AES",
            SboxArg::Experimental => "EXPERIMENTAL",
            SboxArg::Alternate => "ALTERNATE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ConstructionArg {
    /// FIPS-197 rounds.
    Standard,
    /// MixColumns replaced by the alternate table.
    AltMix,
    /// SubBytes composed with the alternate table, MixColumns kept.
    Composed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AttackArg {
    /// Correlation power analysis.
    Cpa,
    /// Difference-of-means power analysis.
    Dpa,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Uniformly random permutations.
    Random,
    /// Affine-equivalent variants of the base table.
    Affine,
}

/// Selects the main S-box and the round construction.
#[derive(Args, Clone, Debug)]
struct CipherArgs {
    /// Built-in main S-box.
    #[arg(long, value_enum, default_value_t = SboxArg::Standard)]
    sbox: SboxArg,
    /// Catalog file to take the main S-box from (overrides --sbox).
    #[arg(long, value_name = "FILE", requires = "entry")]
    catalog: Option<PathBuf>,
    /// Catalog entry name.
    #[arg(long, value_name = "NAME", requires = "catalog")]
    entry: Option<String>,
    /// Round construction.
    #[arg(long, value_enum, default_value_t = ConstructionArg::Standard)]
    construction: ConstructionArg,
    /// Second table for the alt-mix and composed constructions.
    #[arg(long, value_enum, default_value_t = SboxArg::Alternate)]
    alt_sbox: SboxArg,
}

impl CipherArgs {
    fn config(&self) -> Result<CipherConfig> {
        let sbox = match (&self.catalog, &self.entry) {
            (Some(path), Some(name)) => load_catalog(path)?
                .table(name)
                .with_context(|| format!("select {name} from {}", path.display()))?,
            _ => self.sbox.table(),
        };
        let alt = self.alt_sbox.table();
        let construction = match self.construction {
            ConstructionArg::Standard => Construction::Standard,
            ConstructionArg::AltMix => Construction::AlternateMix(alt),
            ConstructionArg::Composed => Construction::ComposedSubstitution(alt),
        };
        Ok(CipherConfig { sbox, construction })
    }
}

/// Key, IV and mode shared by the file commands.
#[derive(Args, Clone, Debug)]
struct StreamArgs {
    /// AES key as 32, 48 or 64 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: String,
    /// IV (CBC) or initial counter (CTR) as 32 hex characters.
    #[arg(long, value_name = "HEX", default_value = DEFAULT_IV_HEX)]
    iv_hex: String,
    /// Block mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Cbc)]
    mode: ModeArg,
    #[command(flatten)]
    cipher: CipherArgs,
    /// Input file (a multiple of 16 bytes for ECB and CBC).
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output path.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

/// Simulated side-channel assessment of a table.
#[derive(Args, Clone, Debug)]
struct AttackArgs {
    /// Key under attack as 32, 48 or 64 hex characters (the first 16 bytes are recovered).
    #[arg(long, value_name = "HEX", default_value = DEFAULT_ATTACK_KEY_HEX)]
    key_hex: String,
    /// Target mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Ecb)]
    mode: ModeArg,
    #[command(flatten)]
    cipher: CipherArgs,
    /// Key-recovery technique.
    #[arg(long, value_enum, default_value_t = AttackArg::Cpa)]
    method: AttackArg,
    /// Standard deviation of the simulated Gaussian noise.
    #[arg(long, default_value_t = 1.0)]
    noise: f64,
    /// Upper bound of the trace-count search.
    #[arg(long, default_value_t = 500)]
    max_traces: usize,
    /// Campaigns per trace count; 90% must recover the key.
    #[arg(long, default_value_t = 10)]
    runs: usize,
    /// Attack this many traces per campaign instead of searching.
    #[arg(long)]
    traces: Option<usize>,
    /// Assess every permutation in this catalog instead of a single table.
    #[arg(long, value_name = "FILE", conflicts_with = "entry")]
    sweep: Option<PathBuf>,
    /// Optional RNG seed for reproducible assessments.
    #[arg(long)]
    seed: Option<u64>,
}

impl AttackArgs {
    fn assessment(&self, cipher: CipherConfig) -> Assessment {
        Assessment {
            attack: match self.method {
                AttackArg::Cpa => Attack::Cpa,
                AttackArg::Dpa => Attack::Dpa,
            },
            noise: self.noise,
            max_traces: self.max_traces,
            runs: self.runs,
            ..Assessment::new(TargetConfig {
                mode: self.mode.target_mode(),
                cipher,
            })
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file.
    Enc(StreamArgs),
    /// Decrypt a file.
    Dec(StreamArgs),
    /// Check the standard table against the SP 800-38A ECB vectors.
    Kat,
    /// Print the cryptographic profile of S-boxes.
    Analyze {
        /// Built-in table to analyze (all three when omitted).
        #[arg(long, value_enum, conflicts_with = "catalog")]
        sbox: Option<SboxArg>,
        /// Analyze every entry of this catalog instead.
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
    },
    /// Build a catalog of generated S-boxes.
    Gen {
        /// Number of tables to generate.
        #[arg(long, default_value_t = 8)]
        count: usize,
        /// Derivation strategy.
        #[arg(long, value_enum, default_value_t = StrategyArg::Affine)]
        strategy: StrategyArg,
        /// Base table for affine-equivalent generation.
        #[arg(long, value_enum, default_value_t = SboxArg::Standard)]
        base: SboxArg,
        /// Text listing (`ID, 0xHH, ...` per line) to import as well.
        #[arg(long, value_name = "FILE")]
        listing: Option<PathBuf>,
        /// Also store the built-in tables.
        #[arg(long, default_value_t = false)]
        include_builtin: bool,
        /// Compute and store metrics for every entry.
        #[arg(long, default_value_t = false)]
        with_metrics: bool,
        /// Optional RNG seed for reproducible generation.
        #[arg(long)]
        seed: Option<u64>,
        /// Output path for the serialized catalog.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Render a table and its inverse (`R<NAME>`) as Rust array literals.
    Export {
        #[command(flatten)]
        cipher: CipherArgs,
        /// Identifier for the forward array.
        #[arg(long, default_value = "SBOX")]
        name: String,
        /// Write to a file instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Run a fixed-key capture campaign and print `key,text_in,text_out` lines.
    Capture {
        /// AES key as 32, 48 or 64 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Target mode (ECB: 16-byte payloads, CBC/CTR: 64-byte payloads).
        #[arg(long, value_enum, default_value_t = ModeArg::Ecb)]
        mode: ModeArg,
        #[command(flatten)]
        cipher: CipherArgs,
        /// Number of captures.
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Optional RNG seed for reproducible payloads.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate Hamming-weight traces and count how many an attack needs.
    Attack(AttackArgs),
    /// Run a local demo: random key, every mode, experimental tables.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc(args) => cmd_stream(&args, Direction::Encrypt),
        Commands::Dec(args) => cmd_stream(&args, Direction::Decrypt),
        Commands::Kat => cmd_kat(),
        Commands::Analyze { sbox, catalog } => cmd_analyze(sbox, catalog.as_deref()),
        Commands::Gen {
            count,
            strategy,
            base,
            listing,
            include_builtin,
            with_metrics,
            seed,
            out,
        } => cmd_gen(
            count,
            strategy,
            base,
            listing.as_deref(),
            include_builtin,
            with_metrics,
            seed,
            &out,
        ),
        Commands::Export {
            cipher,
            name,
            output,
        } => cmd_export(&cipher, &name, output.as_deref()),
        Commands::Capture {
            key_hex,
            mode,
            cipher,
            samples,
            seed,
        } => cmd_capture(&key_hex, mode, &cipher, samples, seed),
        Commands::Attack(args) => cmd_attack(&args),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn cmd_stream(args: &StreamArgs, direction: Direction) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let iv = parse_iv_hex(&args.iv_hex)?;
    let config = args.cipher.config()?;
    let mut data =
        fs::read(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    apply_mode(&key, &iv, &config, args.mode, direction, &mut data)?;
    fs::write(&args.output, data).with_context(|| format!("write {}", args.output.display()))?;
    Ok(())
}

fn apply_mode(
    key: &Key,
    iv: &Block,
    config: &CipherConfig,
    mode: ModeArg,
    direction: Direction,
    data: &mut [u8],
) -> Result<()> {
    let mut ctx = Context::with_iv(key, iv, config);
    let result = match (mode, direction) {
        (ModeArg::Ecb, Direction::Encrypt) => ctx.encrypt_ecb(data),
        (ModeArg::Ecb, Direction::Decrypt) => ctx.decrypt_ecb(data),
        (ModeArg::Cbc, Direction::Encrypt) => ctx.encrypt_cbc(data),
        (ModeArg::Cbc, Direction::Decrypt) => ctx.decrypt_cbc(data),
        (ModeArg::Ctr, _) => {
            ctx.xcrypt_ctr(data);
            Ok(())
        }
    };
    result.with_context(|| format!("{mode:?} {direction:?}"))
}

/// SP 800-38A F.1 ECB vectors: (key, plaintext block, ciphertext block).
const KAT_VECTORS: [(&str, &str, &str); 3] = [
    (
        "2b7e151628aed2a6abf7158809cf4f3c",
        "6bc1bee22e409f96e93d7e117393172a",
        "3ad77bb40d7a3660a89ecaf32466ef97",
    ),
    (
        "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        "6bc1bee22e409f96e93d7e117393172a",
        "bd334f1d6e45f25ff712a214571fa5cc",
    ),
    (
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        "6bc1bee22e409f96e93d7e117393172a",
        "f3eed1bdb5d2a03c064b5a7e3db181f8",
    ),
];

fn run_kat() -> Result<()> {
    for (key_hex, plain_hex, cipher_hex) in KAT_VECTORS {
        let key = parse_key_hex(key_hex)?;
        let ctx = Context::new(&key, &CipherConfig::default());
        let plain = parse_iv_hex(plain_hex)?;
        let mut block = plain;
        ctx.encrypt_block_ecb(&mut block);
        if hex::encode(block) != cipher_hex {
            bail!("{:?} encryption mismatch", key.size());
        }
        ctx.decrypt_block_ecb(&mut block);
        if block != plain {
            bail!("{:?} decryption mismatch", key.size());
        }
    }
    Ok(())
}

fn cmd_kat() -> Result<()> {
    run_kat()?;
    println!("known-answer tests passed ({} vectors)", KAT_VECTORS.len());
    Ok(())
}

fn cmd_analyze(sbox: Option<SboxArg>, catalog_path: Option<&Path>) -> Result<()> {
    let mut catalog = match (catalog_path, sbox) {
        (Some(path), _) => load_catalog(path)?,
        (None, Some(arg)) => {
            let mut catalog = SboxCatalog::default();
            catalog.insert(SboxEntry::new(arg.catalog_name(), &arg.table()));
            catalog
        }
        (None, None) => SboxCatalog::builtin(),
    };
    catalog.compute_metrics();
    for entry in &catalog.entries {
        if let Some(metrics) = &entry.metrics {
            println!("{}: {}", entry.name, format_metrics(metrics));
        }
    }
    Ok(())
}

fn format_metrics(m: &SboxMetrics) -> String {
    let bu = m
        .boomerang_uniformity
        .map_or_else(|| "-".to_owned(), |bu| bu.to_string());
    format!(
        "nonlinearity={} linearity={} lp={:.4} du={} dp={:.4} bu={} dbn={} lbn={} bic={:.4} sac={:.4}",
        m.nonlinearity,
        m.linearity,
        m.linear_probability,
        m.differential_uniformity,
        m.differential_probability,
        bu,
        m.differential_branch_number,
        m.linear_branch_number,
        m.bic,
        m.sac,
    )
}

#[allow(clippy::too_many_arguments)]
fn cmd_gen(
    count: usize,
    strategy: StrategyArg,
    base: SboxArg,
    listing: Option<&Path>,
    include_builtin: bool,
    with_metrics: bool,
    seed: Option<u64>,
    out: &Path,
) -> Result<()> {
    let mut catalog = if include_builtin {
        SboxCatalog::builtin()
    } else {
        SboxCatalog::default()
    };

    if let Some(path) = listing {
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let imported = SboxCatalog::parse_listing(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        for entry in imported.entries {
            catalog.insert(entry);
        }
    }

    let strategy = match strategy {
        StrategyArg::Random => Strategy::RandomPermutation,
        StrategyArg::Affine => Strategy::AffineEquivalent,
    };
    let mut gen = Generator::with_config(seeded_rng(seed), GeneratorConfig { strategy });
    let base_table = base.table();
    for index in 0..count {
        let table = gen.generate(&base_table);
        catalog.insert(SboxEntry::new(format!("GEN{index}"), &table));
    }

    if with_metrics {
        catalog.compute_metrics();
    }
    let bytes = catalog.to_bytes().context("serialize catalog")?;
    fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
    println!("wrote {} S-boxes to {}", catalog.entries.len(), out.display());
    Ok(())
}

fn cmd_export(cipher: &CipherArgs, name: &str, output: Option<&Path>) -> Result<()> {
    let text = render_pair(name, &cipher.config()?.sbox);
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn cmd_capture(
    key_hex: &str,
    mode: ModeArg,
    cipher: &CipherArgs,
    samples: usize,
    seed: Option<u64>,
) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let config = TargetConfig {
        mode: mode.target_mode(),
        cipher: cipher.config()?,
    };
    let mut campaign =
        Campaign::new(config, key.as_bytes(), seeded_rng(seed)).context("load key into target")?;
    for record in campaign.run(samples).context("capture")? {
        println!(
            "{},{},{}",
            hex::encode(&record.key),
            hex::encode(&record.text_in),
            hex::encode(&record.text_out)
        );
    }
    Ok(())
}

fn cmd_attack(args: &AttackArgs) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let base = args.cipher.config()?;
    let mut rng = seeded_rng(args.seed);

    let targets: Vec<(String, CipherConfig)> = match &args.sweep {
        Some(path) => load_catalog(path)?
            .entries
            .iter()
            .filter_map(|entry| match SboxTable::from_forward(entry.forward) {
                Ok(sbox) => Some((entry.name.clone(), CipherConfig { sbox, ..base })),
                Err(_) => {
                    println!("{}: not a permutation, skipped", entry.name);
                    None
                }
            })
            .collect(),
        None => vec![("table".to_owned(), base)],
    };

    for (name, cipher) in targets {
        let assessment = args.assessment(cipher);
        match args.traces {
            Some(traces) => {
                let successes = assessment
                    .successes(key.as_bytes(), traces, &mut rng)
                    .with_context(|| format!("attack {name}"))?;
                println!(
                    "{name}: {successes}/{} runs recovered the key from {traces} traces",
                    args.runs
                );
            }
            None => match assessment
                .traces_to_break(key.as_bytes(), &mut rng)
                .with_context(|| format!("assess {name}"))?
            {
                Some(traces) => println!("{name}: {traces}"),
                None => println!("{name}: no break within {} traces", args.max_traces),
            },
        }
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Key::from(key_bytes);
    let iv = parse_iv_hex(DEFAULT_IV_HEX)?;

    let mut plaintext = [0u8; 64];
    rng.fill_bytes(&mut plaintext);

    let configs = [
        ("standard", CipherConfig::default()),
        (
            "experimental",
            CipherConfig::with_sbox(SboxTable::EXPERIMENTAL),
        ),
        (
            "alt-mix",
            CipherConfig {
                sbox: SboxTable::EXPERIMENTAL,
                construction: Construction::AlternateMix(SboxTable::ALTERNATE),
            },
        ),
    ];

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", hex::encode(plaintext));
    for (label, config) in configs {
        for mode in [ModeArg::Ecb, ModeArg::Cbc, ModeArg::Ctr] {
            let mut data = plaintext;
            apply_mode(&key, &iv, &config, mode, Direction::Encrypt, &mut data)?;
            let ciphertext_hex = hex::encode(data);
            apply_mode(&key, &iv, &config, mode, Direction::Decrypt, &mut data)?;
            if data != plaintext {
                bail!("demo roundtrip failed for {label} {mode:?}");
            }
            println!("{label} {mode:?}: {ciphertext_hex}");
        }
    }
    Ok(())
}

fn parse_key_hex(hex_str: &str) -> Result<Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Key::try_from(&bytes[..]).context("AES key must be 16, 24 or 32 bytes (32, 48 or 64 hex characters)")
}

fn parse_iv_hex(hex_str: &str) -> Result<Block> {
    let mut iv = [0u8; 16];
    hex::decode_to_slice(hex_str.trim(), &mut iv)
        .context("IV must be 16 bytes (32 hex characters)")?;
    Ok(iv)
}

fn load_catalog(path: &Path) -> Result<SboxCatalog> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    SboxCatalog::from_bytes(&bytes).context("deserialize catalog")
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
