use iced::widget::{column, container, pick_list, row, scrollable, text, Column, Row, Space};
use iced::{executor, theme, window, Application, Background, Color, Command, Element, Length, Settings, Theme};
use log::{debug, error};

mod api_handler;
mod data_types;
mod headers;
mod ui;

use api_handler::{ApiHandler, FetchError};
use data_types::{cell_text, Dataset, Level, Metadata, Selection, TableKind, METADATA_LINES};
use headers::{is_numeric, ordered_headers};
use ui::{Styles, THEME};

const VERSION: &str = "0.1.0";

pub fn main() -> iced::Result {
    env_logger::init();

    RegioViewer::run(Settings {
        window: window::Settings {
            size: (1100, 840),
            ..Default::default()
        },
        ..Settings::default()
    })
}

struct RegioViewer {
    selection: Selection,
    dataset: Dataset,
    metadata: Metadata,
    last_error: Option<FetchError>,
}

#[derive(Debug, Clone)]
enum Message {
    TableSelected(TableKind),
    LevelSelected(Level),
    // Responses carry the selection they were issued for, so resolutions
    // that lost a race against a newer selection can be dropped.
    DatasetFetched(Selection, Result<Dataset, FetchError>),
    MetadataFetched(TableKind, Result<Metadata, FetchError>),
}

fn fetch_dataset_command(key: Selection) -> Command<Message> {
    Command::perform(
        async move {
            let api = ApiHandler::new();
            api.fetch_dataset(key.table, key.level).await
        },
        move |result| Message::DatasetFetched(key, result),
    )
}

fn fetch_metadata_command(table: TableKind) -> Command<Message> {
    Command::perform(
        async move {
            let api = ApiHandler::new();
            api.fetch_metadata(table).await
        },
        move |result| Message::MetadataFetched(table, result),
    )
}

impl Application for RegioViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let selection = Selection::default();

        (
            RegioViewer {
                selection,
                dataset: Dataset::empty(),
                metadata: Metadata::default(),
                last_error: None,
            },
            Command::batch(vec![
                fetch_dataset_command(selection),
                fetch_metadata_command(selection.table),
            ]),
        )
    }

    fn title(&self) -> String {
        format!("Regionaldaten Viewer v{}", VERSION)
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::TableSelected(table) => {
                self.selection = self.selection.with_table(table);

                // A table change invalidates both the rows and the metadata.
                Command::batch(vec![
                    fetch_dataset_command(self.selection),
                    fetch_metadata_command(self.selection.table),
                ])
            }

            Message::LevelSelected(level) => {
                self.selection = self.selection.with_level(level);

                // Metadata is keyed by table alone.
                fetch_dataset_command(self.selection)
            }

            Message::DatasetFetched(key, result) => {
                if key != self.selection {
                    debug!("discarding stale dataset response for {key:?}");
                    return Command::none();
                }

                match result {
                    Ok(dataset) => {
                        self.dataset = dataset;
                        self.last_error = None;
                    }
                    Err(err) => {
                        // Keep showing the previous rows.
                        error!("dataset fetch failed: {err}");
                        self.last_error = Some(err);
                    }
                }
                Command::none()
            }

            Message::MetadataFetched(table, result) => {
                if table != self.selection.table {
                    debug!("discarding stale metadata response for {table:?}");
                    return Command::none();
                }

                match result {
                    Ok(metadata) => {
                        self.metadata = metadata;
                        self.last_error = None;
                    }
                    Err(err) => {
                        error!("metadata fetch failed: {err}");
                        self.last_error = Some(err);
                    }
                }
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = &*THEME;

        let heading = text("Regionaldatenbank")
            .size(26)
            .style(theme::Text::Color(styles.fg));

        let controls = row![
            pick_list(
                &TableKind::ALL[..],
                Some(self.selection.table),
                Message::TableSelected,
            )
            .width(Length::Fill),
            pick_list(
                &Level::ALL[..],
                Some(self.selection.level),
                Message::LevelSelected,
            )
            .width(Length::Fill),
        ]
        .spacing(10);

        let metadata_lines: Vec<Element<Message>> = (0..METADATA_LINES)
            .map(|index| {
                text(self.metadata.line(index))
                    .size(15)
                    .style(theme::Text::Color(styles.fg))
                    .into()
            })
            .collect();

        let metadata_panel = container(Column::with_children(metadata_lines).spacing(2))
            .width(Length::Fill)
            .padding(10)
            .style(theme::Container::Custom(Box::new(PanelStyle {
                bg: styles.panel_bg,
            })));

        let content = column![
            heading,
            controls,
            metadata_panel,
            self.render_table(styles)
        ]
        .spacing(12)
        .padding(16)
        .height(Length::Fill);

        let page = column![content, self.render_footer(styles)];

        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Custom(Box::new(PanelStyle {
                bg: styles.bg,
            })))
            .into()
    }
}

impl RegioViewer {
    fn render_table(&self, styles: &Styles) -> Element<Message> {
        let headers = ordered_headers(&self.dataset);

        let header_row = Row::with_children(
            headers
                .iter()
                .map(|header| {
                    cell(
                        header.clone(),
                        column_width(header),
                        styles.header_bg,
                        styles.header_fg,
                    )
                })
                .collect(),
        )
        .spacing(1);

        let body = self.dataset.rows.iter().enumerate().map(|(index, data_row)| {
            let bg = if index % 2 == 1 {
                styles.stripe_bg
            } else {
                styles.bg
            };

            Row::with_children(
                headers
                    .iter()
                    .map(|header| {
                        cell(cell_text(data_row, header), column_width(header), bg, styles.fg)
                    })
                    .collect(),
            )
            .spacing(1)
            .into()
        });

        let grid = column![header_row]
            .push(Column::with_children(body.collect()).spacing(1))
            .spacing(1);

        scrollable(grid).height(Length::Fill).into()
    }

    fn render_footer(&self, styles: &Styles) -> Element<Message> {
        let status: Element<Message> = match &self.last_error {
            Some(err) => text(err.to_string())
                .size(14)
                .style(theme::Text::Color(styles.error_fg))
                .into(),
            None => text(format!("v{}", VERSION))
                .size(14)
                .style(theme::Text::Color(styles.footer_fg))
                .into(),
        };

        container(
            row![
                text("Regionaldaten Viewer")
                    .size(14)
                    .style(theme::Text::Color(styles.footer_fg)),
                Space::with_width(Length::Fill),
                status,
            ]
            .spacing(5),
        )
        .width(Length::Fill)
        .padding(10)
        .style(theme::Container::Custom(Box::new(PanelStyle {
            bg: styles.footer_bg,
        })))
        .into()
    }
}

fn cell(content: String, width: Length, bg: Color, fg: Color) -> Element<'static, Message> {
    container(text(content).size(15).style(theme::Text::Color(fg)))
        .width(width)
        .padding(5)
        .style(theme::Container::Custom(Box::new(PanelStyle { bg })))
        .into()
}

// Year columns are narrow, the leading textual columns get more room.
fn column_width(header: &str) -> Length {
    if is_numeric(header) {
        Length::Fixed(90.0)
    } else {
        Length::Fixed(160.0)
    }
}

struct PanelStyle {
    bg: Color,
}

impl container::StyleSheet for PanelStyle {
    type Style = Theme;

    fn appearance(&self, _theme: &Theme) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            ..container::Appearance::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn app() -> RegioViewer {
        RegioViewer::new(()).0
    }

    fn dataset(land: &str) -> Dataset {
        let row = match json!({ "Land": land, "1992": 100.0 }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Dataset { rows: vec![row] }
    }

    fn application_error() -> FetchError {
        FetchError::Application {
            status: "error".to_string(),
            message: "An error occurred".to_string(),
        }
    }

    #[test]
    fn selecting_a_level_keeps_the_table_choice() {
        let mut viewer = app();
        let _ = viewer.update(Message::LevelSelected(Level::Kreis));

        assert_eq!(viewer.selection.level, Level::Kreis);
        assert_eq!(viewer.selection.table, Selection::default().table);
    }

    #[test]
    fn matching_dataset_response_replaces_the_rows() {
        let mut viewer = app();
        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Ok(dataset("Bayern")),
        ));

        assert_eq!(viewer.dataset, dataset("Bayern"));
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn response_for_a_superseded_level_is_discarded() {
        let mut viewer = app();
        let stale_key = viewer.selection;

        // The user moves on before the first response resolves.
        let _ = viewer.update(Message::LevelSelected(Level::Regierungsbezirk));
        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Ok(dataset("Oberbayern")),
        ));

        let _ = viewer.update(Message::DatasetFetched(stale_key, Ok(dataset("Bayern"))));

        assert_eq!(viewer.dataset, dataset("Oberbayern"));
    }

    #[test]
    fn failed_fetch_keeps_the_previous_rows_and_records_the_error() {
        let mut viewer = app();
        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Ok(dataset("Bayern")),
        ));

        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Err(application_error()),
        ));

        assert_eq!(viewer.dataset, dataset("Bayern"));
        assert_eq!(viewer.last_error, Some(application_error()));
    }

    #[test]
    fn next_successful_fetch_clears_the_recorded_error() {
        let mut viewer = app();
        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Err(application_error()),
        ));
        assert!(viewer.last_error.is_some());

        let _ = viewer.update(Message::DatasetFetched(
            viewer.selection,
            Ok(dataset("Bayern")),
        ));
        assert!(viewer.last_error.is_none());
    }

    #[test]
    fn metadata_response_for_another_table_is_discarded() {
        let mut viewer = app();
        let old_table = viewer.selection.table;

        let _ = viewer.update(Message::TableSelected(TableKind::Erwerbstaetige));
        let _ = viewer.update(Message::MetadataFetched(
            old_table,
            Ok(Metadata::new(vec!["stale".to_string()])),
        ));

        assert_eq!(viewer.metadata, Metadata::default());
    }

    #[test]
    fn metadata_for_the_current_table_survives_a_level_change() {
        let mut viewer = app();
        let lines = Metadata::new(vec!["Bruttoinlandsprodukt".to_string()]);

        let _ = viewer.update(Message::MetadataFetched(
            viewer.selection.table,
            Ok(lines.clone()),
        ));
        let _ = viewer.update(Message::LevelSelected(Level::Kreis));

        assert_eq!(viewer.metadata, lines);
    }
}
