use crate::config::StorageConfig;

/// Name of the stored image for a menu item: `<id><ext>`.
pub fn image_file_name(id: i32, extension: &str) -> String {
    format!("{id}{extension}")
}

/// File store path of an image inside the configured images directory.
pub fn store_path(storage: &StorageConfig, file_name: &str) -> String {
    format!("{}/{}", storage.images_dir.trim_matches('/'), file_name)
}

/// Image reference saved on the row (`/images/7.png`).
pub fn image_reference(storage: &StorageConfig, file_name: &str) -> String {
    format!("/{}", store_path(storage, file_name))
}

/// File store path of the shared placeholder image.
pub fn default_image_path(storage: &StorageConfig) -> String {
    store_path(storage, &storage.default_image)
}

/// Converts a stored image reference back to a file store path.
///
/// Accepts both `/images/7.png` and the backslash form `\images\7.png`.
pub fn reference_to_store_path(reference: &str) -> Option<String> {
    let path = reference
        .trim()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string();
    if path.is_empty() { None } else { Some(path) }
}
