//! Fixed user-facing reply texts. The bot speaks Russian only.

pub const START: &str = "Привет! Я бот для расшифровки голосовых сообщений.\n\n\
Пришлите мне голосовое сообщение, аудиофайл или документ с аудио — \
я верну текстовую расшифровку.";

pub const HELP: &str = "Доступные команды:\n\
/start — начать работу с ботом\n\
/help — показать эту справку\n\n\
Просто пришлите голосовое сообщение или аудиофайл, и я расшифрую его в текст. \
Длинные расшифровки приходят файлом с кратким превью.";

pub const PROCESSING: &str = "Обрабатываю аудио, это может занять немного времени...";

pub const ACCESS_DENIED: &str = "Доступ ограничен. Обратитесь к владельцу бота.";

pub const UNSUPPORTED_FORMAT: &str =
    "Не удалось распознать файл: такой формат аудио не поддерживается.";

pub const SERVICE_UNAVAILABLE: &str =
    "Сервис распознавания временно недоступен. Попробуйте позже.";

pub const TIMEOUT_ERROR: &str =
    "Истекло ожидание ответа от сервиса. Попробуйте ещё раз.";

pub const DOWNLOAD_ERROR: &str = "Не удалось скачать файл. Попробуйте отправить его ещё раз.";

pub const GENERAL_ERROR: &str = "Произошла ошибка при обработке. Попробуйте позже.";

pub const EMPTY_TRANSCRIPTION: &str =
    "В аудио не найдено речи — расшифровка получилась пустой.";

/// Header for one part of a chunked transcript, 1-based.
pub fn part_header(index: usize, total: usize) -> String {
    format!("📝 Часть {}/{}:\n\n", index, total)
}

/// Header for the summary reply that follows a delivered transcript.
pub const SUMMARY_HEADER: &str = "📋 Саммари:\n\n";
