// Fixed prompt text for the financial assistant, per output language.

use crate::config::Language;

pub const SYSTEM_INSTRUCTION_EN: &str = "You are a smart, cheerful and knowledgeable financial assistant. \
Answer the user's questions about finance, economics, or the data that has been uploaded and analysed in this application. \
When analysed data is available, use it to give the most accurate answer possible. \
Always keep a professional yet friendly tone and always answer in English.";

pub const SYSTEM_INSTRUCTION_VI: &str = "Bạn là một trợ lý tài chính thông minh, vui vẻ và am hiểu. \
Hãy trả lời các câu hỏi của người dùng về tài chính, kinh tế, hoặc dữ liệu đã được tải lên/phân tích trên ứng dụng này. \
Nếu dữ liệu phân tích có sẵn, hãy sử dụng nó để trả lời chính xác nhất. \
Luôn duy trì giọng điệu chuyên nghiệp và thân thiện bằng tiếng Việt.";

pub const GREETING_EN: &str = "Hello! Upload a financial statement to start the analysis. \
After that you can ask me anything about the analysed data or general financial knowledge.";

pub const GREETING_VI: &str = "Chào bạn! Hãy tải lên báo cáo tài chính để bắt đầu phân tích. \
Sau đó, bạn có thể hỏi tôi bất kỳ câu hỏi nào về dữ liệu đã phân tích hoặc kiến thức tài chính tổng quát nhé!";

const OVERALL_ANALYSIS_EN: &str = r#"
You are a professional financial analyst. Based on the financial indicators below, give an objective, concise assessment (about 3-4 paragraphs) of the company's financial position. Focus on growth rates, changes in the asset structure and the current ratio.

Raw data and indicators:
"#;

const OVERALL_ANALYSIS_VI: &str = r#"
Bạn là một chuyên gia phân tích tài chính chuyên nghiệp. Dựa trên các chỉ số tài chính sau, hãy đưa ra một nhận xét khách quan, ngắn gọn (khoảng 3-4 đoạn) về tình hình tài chính của doanh nghiệp. Đánh giá tập trung vào tốc độ tăng trưởng, thay đổi cơ cấu tài sản và khả năng thanh toán hiện hành.

Dữ liệu thô và chỉ số:
"#;

pub struct ContextHeadings {
    pub header: &'static str,
    pub table_intro: &'static str,
    pub prior_ratio: &'static str,
    pub current_ratio: &'static str,
    pub closing: &'static str,
}

pub fn system_instruction(language: Language) -> &'static str {
    match language {
        Language::English => SYSTEM_INSTRUCTION_EN,
        Language::Vietnamese => SYSTEM_INSTRUCTION_VI,
    }
}

pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::English => GREETING_EN,
        Language::Vietnamese => GREETING_VI,
    }
}

pub fn context_headings(language: Language) -> ContextHeadings {
    match language {
        Language::English => ContextHeadings {
            header: "ANALYSED DATA CONTEXT:",
            table_intro: "The user has uploaded and analysed a financial statement. Processed table:",
            prior_ratio: "Current ratio (prior period)",
            current_ratio: "Current ratio (current period)",
            closing: "PLEASE USE THE DATA ABOVE TO ANSWER THE FOLLOWING QUESTION:",
        },
        Language::Vietnamese => ContextHeadings {
            header: "BỐI CẢNH DỮ LIỆU ĐÃ PHÂN TÍCH:",
            table_intro: "Người dùng đã tải lên và phân tích báo cáo tài chính. Dữ liệu bảng đã xử lý:",
            prior_ratio: "Chỉ số Thanh toán Hiện hành Năm trước",
            current_ratio: "Chỉ số Thanh toán Hiện hành Năm sau",
            closing: "VUI LÒNG DÙNG DỮ LIỆU TRÊN ĐỂ TRẢ LỜI CÂU HỎI TIẾP THEO:",
        },
    }
}

/// One-shot "analyse everything" prompt wrapped around the indicator block.
pub fn overall_analysis_prompt(language: Language, indicators: &str) -> String {
    let intro = match language {
        Language::English => OVERALL_ANALYSIS_EN,
        Language::Vietnamese => OVERALL_ANALYSIS_VI,
    };
    format!("{}{}", intro.trim_start(), indicators)
}
