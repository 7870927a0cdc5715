#![forbid(unsafe_code)]

//! Weft demo: a localized patient roster with live formatter bindings.
//!
//! Each roster row binds a `{first} {last}` name template to a patient
//! view model. The demo prints the roster, swaps every patient's names
//! (one recompute per row thanks to batching), switches the locale to
//! German, and prints the reformatted roster.
//!
//! # Running
//!
//! ```sh
//! cargo run -p weft-demo
//! ```

mod patient;

use tracing::info;
use tracing_subscriber::EnvFilter;

use patient::Patient;
use weft_i18n::{StringTable, Translator};
use weft_reactive::{FormatterBinding, ReplacePair, Subscription};

const NAME_KEY: &str = "patient.name";

fn build_translator() -> Translator {
    let mut en = StringTable::new();
    en.insert(NAME_KEY, "{first} {last}");
    en.insert("roster.title", "Patients");

    let mut de = StringTable::new();
    de.insert(NAME_KEY, "{last}, {first}");
    de.insert("roster.title", "Patienten");

    let mut fr = StringTable::new();
    fr.insert(NAME_KEY, "{first} {last}");
    // roster.title intentionally missing: resolves via the en fallback.

    let mut translator = Translator::new();
    translator.add_locale("en", en);
    translator.add_locale("de", de);
    translator.add_locale("fr", fr);
    translator
}

/// One roster row: the binding plus the subscriptions that keep its pairs
/// in sync with the patient's observable name fields.
struct Row {
    binding: FormatterBinding,
    _wires: [Subscription; 2],
}

fn bind_row(translator: &Translator, patient: &Patient) -> Row {
    let binding = FormatterBinding::new();
    binding.set_template(translator.lookup(NAME_KEY));

    let first = ReplacePair::with("{first}", patient.first_name().get());
    let last = ReplacePair::with("{last}", patient.last_name().get());

    let first_wire = {
        let pair = first.clone();
        patient
            .first_name()
            .subscribe(move |name| pair.set_replacement(name.clone()))
    };
    let last_wire = {
        let pair = last.clone();
        patient
            .last_name()
            .subscribe(move |name| pair.set_replacement(name.clone()))
    };

    binding.push_pair(first);
    binding.push_pair(last);

    Row {
        binding,
        _wires: [first_wire, last_wire],
    }
}

fn print_roster(translator: &Translator, rows: &[Row]) {
    println!("--- {} ({}) ---", translator.lookup("roster.title"), translator.locale());
    for row in rows {
        println!("  {}", row.binding.text());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut translator = build_translator();

    let patients = vec![
        Patient::new("Diane", "Selden"),
        Patient::new("Daniel", "Ivery"),
        Patient::new("Phillip", "Whitsett"),
        Patient::new("Guadalupe", "Edwards"),
        Patient::new("Millie", "Dandrea"),
    ];

    let rows: Vec<Row> = patients
        .iter()
        .map(|patient| bind_row(&translator, patient))
        .collect();

    print_roster(&translator, &rows);

    info!("swapping all names");
    for patient in &patients {
        patient.swap_names();
    }
    print_roster(&translator, &rows);

    let change = translator.set_locale("de");
    info!(from = %change.previous, to = %change.current, "locale switched");
    for row in &rows {
        row.binding.set_template(translator.lookup(NAME_KEY));
    }
    print_roster(&translator, &rows);
}
