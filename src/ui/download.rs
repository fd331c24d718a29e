use super::{
    ActiveTheme, AnyElement, AppView, Context, DownloadMessage, DownloadState, IntoElement,
    ModelDownloadEvent, ParentElement, SketchConfig, Styled, StyledExt, Tag, div,
    ensure_pose_model_ready, h_flex, thread, v_flex,
};
use crossbeam_channel::Sender;

impl AppView {
    pub(super) fn poll_download_events(&mut self, state: &mut DownloadState) {
        while let Ok(msg) = self.download_rx.try_recv() {
            match msg {
                DownloadMessage::Event(ModelDownloadEvent::AlreadyPresent) => {
                    state.message = "Pose model found, loading...".to_string();
                }
                DownloadMessage::Event(ModelDownloadEvent::Started { total }) => {
                    state.total = total;
                    state.message = "Downloading pose model...".to_string();
                }
                DownloadMessage::Event(ModelDownloadEvent::Progress { downloaded, total }) => {
                    state.downloaded = downloaded;
                    state.total = total;
                }
                DownloadMessage::Event(ModelDownloadEvent::Finished) => {
                    state.finished = true;
                    state.message = "Pose model ready".to_string();
                }
                DownloadMessage::Error(err) => {
                    state.error = Some(err);
                    state.finished = false;
                    state.message = "Pose model unavailable".to_string();
                }
            }
        }
    }

    pub(super) fn render_download_view(
        &self,
        state: &DownloadState,
        cx: &mut Context<'_, Self>,
    ) -> AnyElement {
        let theme = cx.theme();
        let detail = match (state.total, state.finished) {
            (_, true) => "Done".to_string(),
            (Some(total), false) if total > 0 => {
                let percent = (state.downloaded as f64 / total as f64 * 100.0).clamp(0.0, 100.0);
                format!("{percent:.1}%")
            }
            _ => format!("{} KB", state.downloaded / 1024),
        };

        let (status_text, status_color) = if state.error.is_some() {
            ("✗ Model missing", theme.danger)
        } else if state.finished {
            ("✓ Model ready", theme.success)
        } else {
            ("⟳ Loading...", theme.foreground)
        };

        let mut container = v_flex()
            .gap_3()
            .p_6()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.group_box)
            .child(
                h_flex()
                    .gap_2()
                    .items_center()
                    .child(
                        div()
                            .text_color(status_color)
                            .font_semibold()
                            .child(status_text),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child("Preparing the pose model"),
                    ),
            )
            .child(
                div()
                    .px_3()
                    .py_2()
                    .rounded_md()
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.muted)
                    .font_family(theme.mono_font_family.clone())
                    .text_color(theme.foreground)
                    .child(progress_bar_string(state.downloaded, state.total, state.finished)),
            )
            .child(div().text_sm().text_color(theme.muted_foreground).child(detail))
            .child(div().text_color(theme.foreground).child(state.message.clone()));

        if let Some(err) = &state.error {
            container = container.child(Tag::danger().rounded_full().child(err.clone()));
        }

        v_flex()
            .size_full()
            .items_center()
            .justify_center()
            .bg(theme.background)
            .child(container)
            .into_any_element()
    }
}

pub(super) fn spawn_model_download(
    config: &SketchConfig,
    tx: Sender<DownloadMessage>,
) -> thread::JoinHandle<()> {
    let model_path = config.model_path.clone();
    let url = config.model_url.clone();

    thread::spawn(move || {
        let result = ensure_pose_model_ready(&model_path, url.as_deref(), |event| {
            let _ = tx.send(DownloadMessage::Event(event));
        });

        if let Err(err) = result {
            log::error!("pose model unavailable: {err:?}");
            let _ = tx.send(DownloadMessage::Error(format!("{err:#}")));
        }
    })
}

fn progress_bar_string(downloaded: u64, total: Option<u64>, finished: bool) -> String {
    const BAR_LEN: usize = 30;
    let pct = match total {
        _ if finished => 1.0,
        Some(total) if total > 0 => (downloaded as f64 / total as f64).clamp(0.0, 1.0),
        _ => {
            let cursor = (downloaded / 64) as usize % BAR_LEN + 1;
            return format!("[{:-<width$}] unknown size", ">", width = cursor);
        }
    };

    let filled = ((pct * BAR_LEN as f64).round() as usize).min(BAR_LEN);
    format!(
        "[{}{}] {:>5.1}%",
        "=".repeat(filled),
        " ".repeat(BAR_LEN - filled),
        pct * 100.0
    )
}
