use anyhow::{bail, Context};
use clap::Parser;
use prop_text::escape::escape;
use prop_text::utils::{create_backup, default_export_path};
use prop_text::{PropEditor, TextEncoding, TreeFile};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prop_text")]
#[command(about = "导出属性树中的文本字段，并把编辑后的文本写回")]
#[command(version)]
struct Cli {
    /// 属性树 JSON 文件路径
    #[arg(short, long)]
    tree: PathBuf,

    /// 输出路径（导出模式为文本文件，写回模式为新的树文件）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 写回模式：从文本文件导入修改
    #[arg(long)]
    apply: Option<PathBuf>,

    /// 列出所有文本字段
    #[arg(long)]
    list: bool,

    /// 以 JSON 格式输出列表
    #[arg(long)]
    json: bool,

    /// 显示文本统计信息
    #[arg(long)]
    stats: bool,

    /// ANSI 模式：导出使用 ANSI 编码，导入时强制按 ANSI 解码
    #[arg(long)]
    ansi: bool,

    /// 属性集名称（决定默认导出文件名）
    #[arg(long)]
    name: Option<String>,

    /// 覆盖树文件时不创建备份
    #[arg(long)]
    no_backup: bool,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    validate_input(&cli.tree)?;

    let tree = TreeFile::load(&cli.tree)
        .with_context(|| format!("读取属性树失败: {:?}", cli.tree))?;
    let editor = PropEditor::from_tree_file(tree);

    if cli.stats {
        println!("{}", editor.stats());
        return Ok(());
    }

    if cli.list {
        return handle_list(&cli, &editor);
    }

    if let Some(input) = &cli.apply {
        return handle_apply(&cli, editor, input);
    }

    // 默认模式：导出
    handle_export(&cli, &editor)
}

/// 初始化日志（RUST_LOG 优先）
fn init_logging(quiet: bool) {
    let default_filter = if quiet { "error" } else { "prop_text=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 验证输入文件
fn validate_input(tree: &Path) -> anyhow::Result<()> {
    if !tree.exists() {
        bail!("属性树文件不存在: {:?}", tree);
    }
    Ok(())
}

fn encoding(cli: &Cli) -> TextEncoding {
    if cli.ansi {
        TextEncoding::Ansi
    } else {
        TextEncoding::Utf8
    }
}

/// 处理导出模式
fn handle_export(cli: &Cli, editor: &PropEditor) -> anyhow::Result<()> {
    let output = match &cli.output {
        Some(path) => path.clone(),
        None => {
            let name = cli
                .name
                .clone()
                .or_else(|| cli.tree.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
                .unwrap_or_default();
            default_export_path(Some(&cli.tree), &name)
        }
    };

    let count = editor
        .export(&output, encoding(cli))
        .context("无法写入输出文本文件")?;

    if !cli.quiet {
        println!("已导出 {} 个文本条目到: {:?}", count, output);
    }
    Ok(())
}

/// 处理写回模式
fn handle_apply(cli: &Cli, mut editor: PropEditor, input: &Path) -> anyhow::Result<()> {
    let forced = cli.ansi.then_some(TextEncoding::Ansi);
    let updated = editor
        .import(input, forced)
        .context("无法打开/读取所选文本文件")?;

    if !cli.quiet {
        println!("已从文本文件更新 {} 个文本条目", updated);
        for change in editor.history().iter() {
            println!("  {}", change);
        }
    }

    let destination = match &cli.output {
        Some(path) => path.clone(),
        None if updated == 0 => {
            if !cli.quiet {
                println!("没有变化，树文件保持不变");
            }
            return Ok(());
        }
        None => {
            if !cli.no_backup {
                let backup = create_backup(&cli.tree).context("创建备份失败")?;
                if !cli.quiet {
                    println!("已创建备份文件: {:?}", backup);
                }
            }
            cli.tree.clone()
        }
    };

    editor
        .into_tree_file()
        .save(&destination)
        .with_context(|| format!("写入属性树失败: {:?}", destination))?;

    if !cli.quiet {
        println!("属性树已写入: {:?}", destination);
    }
    Ok(())
}

/// 处理列表模式
fn handle_list(cli: &Cli, editor: &PropEditor) -> anyhow::Result<()> {
    let document = editor.document(encoding(cli));

    if cli.json {
        let json = serde_json::to_string_pretty(&document.entries)?;
        match &cli.output {
            Some(path) => std::fs::write(path, json)
                .with_context(|| format!("写入列表失败: {:?}", path))?,
            None => println!("{}", json),
        }
        return Ok(());
    }

    for entry in &document.entries {
        println!("[{}] {}\t{}", entry.language, entry.path, escape(&entry.text));
    }
    if !cli.quiet {
        println!("共 {} 个文本条目", document.len());
    }
    Ok(())
}
