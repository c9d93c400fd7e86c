// Build script that generates the compiled-in Poseidon parameter tables.
// Build scripts are not part of the hashing path, so we allow expect() and panic().
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
//
// Consumes `params/poseidon377.json` and generates:
// - `modulus_generated.rs` - scalar field modulus constants
// - `params_generated.rs`  - per-rate round constants and matrices
//
// Every constant is emitted in Montgomery form so the tables are plain
// `static` data with no parsing at startup.

use num_bigint::BigUint;
use serde::Deserialize;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const PARAMS_PATH: &str = "params/poseidon377.json";

/// Number of 64-bit limbs in a BLS12-377 scalar.
const LIMBS: usize = 4;

#[derive(Debug, Deserialize)]
struct ParameterFile {
    version: String,
    field: FieldMetadata,
    parameters: Vec<RateParameters>,
}

#[derive(Debug, Deserialize)]
struct FieldMetadata {
    name: String,
    modulus: String,
}

#[derive(Debug, Deserialize)]
struct AlphaMetadata {
    exponent: u64,
    inverse: bool,
}

#[derive(Debug, Deserialize)]
struct RateParameters {
    rate: usize,
    state_size: usize,
    security_level: usize,
    full_rounds: usize,
    partial_rounds: usize,
    alpha: AlphaMetadata,
    arc: Vec<String>,
    optimized_arc: Vec<String>,
    mds: Vec<String>,
    optimized_mds: OptimizedMdsMetadata,
}

#[derive(Debug, Deserialize)]
struct OptimizedMdsMetadata {
    m_hat: Vec<String>,
    v: Vec<String>,
    w: Vec<String>,
    m_prime: Vec<String>,
    m_double_prime: Vec<String>,
    m_inverse: Vec<String>,
    m_hat_inverse: Vec<String>,
    m_00: String,
    m_i: Vec<String>,
    v_collection: Vec<String>,
    w_hat_collection: Vec<String>,
}

/// Converts canonical decimal constants into Montgomery limbs.
struct Encoder {
    modulus: BigUint,
    r: BigUint,
}

impl Encoder {
    fn new(modulus: &str) -> Self {
        let modulus: BigUint = modulus
            .parse()
            .expect("field modulus is not a decimal integer");
        let r = (BigUint::from(1u32) << (64 * LIMBS)) % &modulus;
        Self { modulus, r }
    }

    fn limbs(&self, what: &str, decimal: &str) -> [u64; LIMBS] {
        let value: BigUint = decimal
            .parse()
            .unwrap_or_else(|_| panic!("{}: '{}' is not a decimal integer", what, decimal));
        if value >= self.modulus {
            panic!("{}: {} is not below the field modulus", what, decimal);
        }

        let mont = (value * &self.r) % &self.modulus;
        let digits = mont.to_u64_digits();
        let mut limbs = [0u64; LIMBS];
        limbs[..digits.len()].copy_from_slice(&digits);
        limbs
    }

    fn element(&self, what: &str, decimal: &str) -> String {
        let limbs = self.limbs(what, decimal);
        format!(
            "Fr::from_montgomery_limbs([0x{:016x}, 0x{:016x}, 0x{:016x}, 0x{:016x}])",
            limbs[0], limbs[1], limbs[2], limbs[3]
        )
    }

    fn slice(&self, what: &str, values: &[String]) -> String {
        let mut out = String::from("&[\n");
        for (i, value) in values.iter().enumerate() {
            let label = format!("{}[{}]", what, i);
            writeln!(out, "            {},", self.element(&label, value))
                .expect("writing to a String cannot fail");
        }
        out.push_str("        ]");
        out
    }
}

fn main() {
    println!("cargo:rerun-if-changed={}", PARAMS_PATH);
    println!("cargo:rerun-if-changed=build.rs");

    let content = fs::read_to_string(PARAMS_PATH)
        .unwrap_or_else(|e| panic!("could not read {}: {}", PARAMS_PATH, e));
    let file: ParameterFile = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("could not parse {}: {}", PARAMS_PATH, e));

    if file.version != "1" {
        panic!(
            "unexpected parameter file version '{}', expected '1'",
            file.version
        );
    }
    if file.parameters.is_empty() {
        panic!("{} holds no parameter sets", PARAMS_PATH);
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let out_path = Path::new(&out_dir);
    let encoder = Encoder::new(&file.field.modulus);

    generate_modulus_rs(out_path, &file.field, &encoder);
    generate_params_rs(out_path, &file.parameters, &encoder);
}

fn generate_modulus_rs(out_path: &Path, field: &FieldMetadata, encoder: &Encoder) {
    let mut le_bytes = encoder.modulus.to_bytes_le();
    le_bytes.resize(8 * LIMBS, 0);
    let hex: String = le_bytes.iter().map(|b| format!("{:02x}", b)).collect();

    let code = format!(
        r#"// Field modulus generated from {path}.
//
// DO NOT EDIT - This file is generated by build.rs

/// Name of the hash field as recorded in the parameter file.
pub const FIELD_NAME: &str = "{name}";

/// Scalar field modulus as a decimal string.
pub const MODULUS_DECIMAL: &str = "{decimal}";

/// Scalar field modulus as 64-char hex (little-endian bytes).
pub const MODULUS_HEX: &str = "{hex}";
"#,
        path = PARAMS_PATH,
        name = field.name,
        decimal = field.modulus,
        hex = hex,
    );

    fs::write(out_path.join("modulus_generated.rs"), code)
        .expect("Failed to write modulus_generated.rs");
}

fn generate_params_rs(out_path: &Path, sets: &[RateParameters], encoder: &Encoder) {
    let mut code = String::new();

    code.push_str(&format!(
        r#"// Poseidon parameter tables generated from {}.
//
// DO NOT EDIT - This file is generated by build.rs

/// Raw parameter sets, one per supported rate, in ascending rate order.
pub(crate) static RAW_PARAMETERS: &[RawParameters] = &[
"#,
        PARAMS_PATH
    ));

    for set in sets {
        let name = |field: &str| format!("rate {} {}", set.rate, field);
        let opt = &set.optimized_mds;

        writeln!(code, "    // Rate {}", set.rate).expect("writing to a String cannot fail");
        code.push_str("    RawParameters {\n");
        writeln!(
            code,
            "        rate: {},\n        state_size: {},\n        security_level: {},\n        \
             full_rounds: {},\n        partial_rounds: {},\n        alpha_exponent: {},\n        \
             alpha_inverse: {},",
            set.rate,
            set.state_size,
            set.security_level,
            set.full_rounds,
            set.partial_rounds,
            set.alpha.exponent,
            set.alpha.inverse,
        )
        .expect("writing to a String cannot fail");

        let tables: [(&str, &Vec<String>); 12] = [
            ("arc", &set.arc),
            ("optimized_arc", &set.optimized_arc),
            ("mds", &set.mds),
            ("m_hat", &opt.m_hat),
            ("v", &opt.v),
            ("w", &opt.w),
            ("m_prime", &opt.m_prime),
            ("m_double_prime", &opt.m_double_prime),
            ("m_inverse", &opt.m_inverse),
            ("m_hat_inverse", &opt.m_hat_inverse),
            ("m_i", &opt.m_i),
            ("v_collection", &opt.v_collection),
        ];
        for (field, values) in tables {
            writeln!(code, "        {}: {},", field, encoder.slice(&name(field), values))
                .expect("writing to a String cannot fail");
        }
        writeln!(
            code,
            "        w_hat_collection: {},",
            encoder.slice(&name("w_hat_collection"), &opt.w_hat_collection)
        )
        .expect("writing to a String cannot fail");
        writeln!(
            code,
            "        m_00: {},",
            encoder.element(&name("m_00"), &opt.m_00)
        )
        .expect("writing to a String cannot fail");
        code.push_str("    },\n");
    }

    code.push_str("];\n");

    fs::write(out_path.join("params_generated.rs"), code)
        .expect("Failed to write params_generated.rs");
}
