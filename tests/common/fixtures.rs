use std::path::PathBuf;

pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub fn load_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", relative))
}

/// Minimal entry page with the three fields in the places the wiki puts them
pub fn entry_page(category: &str, native_name: &str, index: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Entry - Bulbapedia</title></head>
<body>
<table class="roundy"><tr>
<td><b>Entry</b><br><span class="explain">{category}</span> Pokémon</td>
<td><b lang="ja">{native_name}</b><br>
<small><a href="/wiki/List_of_Pok%C3%A9mon_by_National_Pok%C3%A9dex_number" title="List of Pokémon by National Pokédex number"><span>#{index}</span></a></small></td>
</tr></table>
</body>
</html>"#,
        category = category,
        native_name = native_name,
        index = index,
    )
}
