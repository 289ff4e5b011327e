use crate::domain::Namespace;

/// Splits a namespace into the dotted metric name and the tags derived from
/// its dynamic segments.
///
/// Dynamic positions are collected first and the name is built from a keep
/// mask over the original positions, so any number of dynamic segments is
/// handled without shifting indexes.
pub fn split_namespace(namespace: &Namespace) -> (String, Vec<(String, String)>) {
    let elements = namespace.elements();
    let mut keep = vec![true; elements.len()];
    let mut tags = Vec::new();

    for index in namespace.dynamic_indexes() {
        let element = &elements[index];
        keep[index] = false;
        if let Some(name) = &element.name {
            tags.push((name.clone(), element.value.clone()));
        }
    }

    let metric = elements
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .map(|(element, _)| element.value.as_str())
        .collect::<Vec<_>>()
        .join(".");

    (metric, tags)
}
