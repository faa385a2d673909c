use std::collections::HashSet;
use std::path::Path;

fn main() {
    let model_path = Path::new("models/glucose_metabolism.json");
    validate_model_file(model_path);
    set_build_dependencies();
}

fn validate_model_file(model_path: &Path) {
    // Ensure model exists at build time
    assert!(
        model_path.exists(),
        "\n\nMODEL BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the pathway model file before building.\n",
        model_path.display()
    );

    let model_contents = std::fs::read_to_string(model_path).unwrap_or_else(|e| {
        panic!(
            "\n\nMODEL BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            model_path.display()
        );
    });

    let model: serde_json::Value = serde_json::from_str(&model_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nMODEL BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            model_path.display()
        );
    });

    validate_model_structure(&model);
}

fn required_array<'a>(model: &'a serde_json::Value, field: &str) -> &'a Vec<serde_json::Value> {
    model
        .get(field)
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!(
                "\n\nMODEL BUILD ERROR: Missing or non-array '{field}' field\n\
                 The model must have a top-level '{field}' array.\n"
            );
        })
}

fn validate_model_structure(model: &serde_json::Value) {
    assert!(
        model.is_object(),
        "\n\nMODEL BUILD ERROR: Root must be a JSON object\n\
         Got: {model}\n"
    );

    let species = required_array(model, "species");
    let compartmentalized = required_array(model, "compartmentalized_species");
    let reactions = required_array(model, "reactions");

    let species_ids = collect_ids(species, "s_id", "species");
    let sc_ids = collect_ids(compartmentalized, "sc_id", "compartmentalized_species");

    for (i, sc) in compartmentalized.iter().enumerate() {
        let s_id = sc.get("s_id").and_then(|v| v.as_str()).unwrap_or("<unknown>");
        assert!(
            species_ids.contains(s_id),
            "\n\nMODEL BUILD ERROR: compartmentalized_species {i} references unknown species '{s_id}'\n"
        );
    }

    let mut participant_count = 0;
    for reaction in reactions {
        participant_count += validate_reaction(reaction, &sc_ids);
    }

    println!(
        "cargo:warning=Validated model: {} species, {} compartmentalized species, {} reactions, {participant_count} participants",
        species.len(),
        compartmentalized.len(),
        reactions.len()
    );
}

fn collect_ids<'a>(rows: &'a [serde_json::Value], key: &str, table: &str) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    for (i, row) in rows.iter().enumerate() {
        let id = row.get(key).and_then(|v| v.as_str()).unwrap_or_else(|| {
            panic!("\n\nMODEL BUILD ERROR: {table} row {i} missing '{key}' field\n");
        });
        assert!(
            ids.insert(id),
            "\n\nMODEL BUILD ERROR: duplicate {key} '{id}' in {table}\n"
        );
    }
    ids
}

fn validate_reaction(reaction: &serde_json::Value, sc_ids: &HashSet<&str>) -> usize {
    let r_id = reaction
        .get("r_id")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>");

    let participants = reaction
        .get("participants")
        .and_then(|p| p.as_array())
        .unwrap_or_else(|| {
            panic!("\n\nMODEL BUILD ERROR: Reaction '{r_id}' missing 'participants' array\n");
        });

    for participant in participants {
        let sc_id = participant
            .get("sc_id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");
        assert!(
            sc_ids.contains(sc_id),
            "\n\nMODEL BUILD ERROR: Reaction '{r_id}' references unknown compartmentalized species '{sc_id}'\n"
        );
    }

    participants.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the embedded model changes
    println!("cargo:rerun-if-changed=models/glucose_metabolism.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
