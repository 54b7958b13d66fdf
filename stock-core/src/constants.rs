/// Основной файл данных по умолчанию
pub const DEFAULT_DATA_FILE: &str = "Stock.txt";

/// Архив (последний снимок основного файла) по умолчанию
pub const DEFAULT_ARCHIVE_FILE: &str = "Archive.txt";
